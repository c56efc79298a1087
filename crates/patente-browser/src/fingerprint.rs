//! Randomized browser fingerprint profiles.

use rand::Rng;

/// Fingerprint configuration for reducing automated-traffic detection
#[derive(Debug, Clone)]
pub struct Fingerprint {
    /// Full user agent string presented to the site
    pub user_agent: String,
    /// Browser window width in pixels
    pub viewport_width: u32,
    /// Browser window height in pixels
    pub viewport_height: u32,
    /// IANA timezone the profile claims to be in
    pub timezone: String,
}

impl Fingerprint {
    /// Generate a randomized fingerprint from realistic desktop profiles
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();

        // Common desktop user agents
        let user_agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ];

        // Common viewport sizes
        let viewports = [(1920, 1080), (1366, 768), (1536, 864), (1440, 900)];

        let ua_idx = rng.gen_range(0..user_agents.len());
        let vp_idx = rng.gen_range(0..viewports.len());
        let (width, height) = viewports[vp_idx];

        Self {
            user_agent: user_agents[ua_idx].to_string(),
            viewport_width: width,
            viewport_height: height,
            timezone: "America/Santiago".to_string(),
        }
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::randomized()
    }
}
