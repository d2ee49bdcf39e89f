//! Debug domains.
//!
//! `BLSETTINGS_DEBUG` holds a list of domain names (`xsettings,displays`,
//! `all`, ...). Domain output goes through the `log` facade with the domain
//! name as the target, so `env_logger` filters can select it too.

use bitflags::bitflags;

/// Environment variable holding the debug domain list.
pub const DEBUG_ENV: &str = "BLSETTINGS_DEBUG";

bitflags! {
    /// A set of debug domains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DebugDomains: u32 {
        /// Set whenever any domain list was given at all.
        const YES                = 1 << 0;
        const XSETTINGS          = 1 << 1;
        const FONTCONFIG         = 1 << 2;
        const KEYBOARD_LAYOUT    = 1 << 3;
        const KEYBOARDS          = 1 << 4;
        const KEYBOARD_SHORTCUTS = 1 << 5;
        const WORKSPACES         = 1 << 6;
        const ACCESSIBILITY      = 1 << 7;
        const POINTERS           = 1 << 8;
        const DISPLAYS           = 1 << 9;
    }
}

const DOMAIN_NAMES: [(&str, DebugDomains); 9] = [
    ("xsettings", DebugDomains::XSETTINGS),
    ("fontconfig", DebugDomains::FONTCONFIG),
    ("keyboard-layout", DebugDomains::KEYBOARD_LAYOUT),
    ("keyboards", DebugDomains::KEYBOARDS),
    ("keyboard-shortcuts", DebugDomains::KEYBOARD_SHORTCUTS),
    ("workspaces", DebugDomains::WORKSPACES),
    ("accessibility", DebugDomains::ACCESSIBILITY),
    ("pointers", DebugDomains::POINTERS),
    ("displays", DebugDomains::DISPLAYS),
];

impl DebugDomains {
    /// Parse a domain list separated by `:`, `;`, `,`, spaces or tabs.
    ///
    /// `all` selects every domain, unknown names are skipped, and any
    /// non-empty input also sets [`DebugDomains::YES`].
    pub fn parse(list: &str) -> Self {
        if list.trim().is_empty() {
            return Self::empty();
        }
        let mut domains = Self::YES;
        for token in list
            .split([':', ';', ',', ' ', '\t'])
            .filter(|t| !t.is_empty())
        {
            if token.eq_ignore_ascii_case("all") {
                domains |= Self::all();
                continue;
            }
            match DOMAIN_NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
            {
                Some((_, flag)) => domains |= *flag,
                None => log::warn!("Unknown debug domain '{token}'"),
            }
        }
        domains
    }

    /// Read [`DEBUG_ENV`]; unset means no domains.
    pub fn from_env() -> Self {
        std::env::var(DEBUG_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_else(|_| Self::empty())
    }

    /// Name of a single domain flag.
    pub fn name(self) -> Option<&'static str> {
        DOMAIN_NAMES
            .iter()
            .find(|(_, flag)| *flag == self)
            .map(|(name, _)| *name)
    }

    /// Names of every domain in this set, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        DOMAIN_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }

    /// An `env_logger` filter enabling debug output for each active domain,
    /// or `None` when nothing is active.
    pub fn log_filter(self) -> Option<String> {
        let names = self.names();
        if names.is_empty() {
            return None;
        }
        Some(
            names
                .iter()
                .map(|n| format!("{n}=debug"))
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// Emit `message` under `domain` when debugging is on at all.
    pub fn dbg(self, domain: DebugDomains, message: std::fmt::Arguments<'_>) {
        if self.is_empty() {
            return;
        }
        Self::emit(domain, message);
    }

    /// Emit `message` only when `domain` itself is active.
    pub fn dbg_filtered(self, domain: DebugDomains, message: std::fmt::Arguments<'_>) {
        if !self.intersects(domain) {
            return;
        }
        Self::emit(domain, message);
    }

    fn emit(domain: DebugDomains, message: std::fmt::Arguments<'_>) {
        let target = domain.name().unwrap_or("blsettings");
        log::debug!(target: target, "{message}");
    }
}
