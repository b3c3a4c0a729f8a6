//! HTTPS-first protocol fallback.
//!
//! Every fast-tier target starts with an HTTPS attempt. What happens next
//! depends only on the tier's [`FallbackPolicy`] and on the HTTPS verdict:
//!
//! | policy                       | HTTPS ok | HTTPS failed |
//! |------------------------------|----------|--------------|
//! | `None`                       | done     | done         |
//! | `ToHttp { prefer_https: false }` | try HTTP | try HTTP |
//! | `ToHttp { prefer_https: true }`  | done     | try HTTP |
//!
//! The HTTP attempt is always terminal.

use probr_common::config::FallbackPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    TryHttp,
    Done,
}

pub fn next_step(policy: FallbackPolicy, https_reachable: bool) -> Step {
    match policy {
        FallbackPolicy::None => Step::Done,
        FallbackPolicy::ToHttp { prefer_https: true } if https_reachable => Step::Done,
        FallbackPolicy::ToHttp { .. } => Step::TryHttp,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
