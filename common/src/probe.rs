use async_trait::async_trait;

/// A single reachability check against one fully-qualified URL.
///
/// Implementations never fail: any error on the way to a response is
/// reported as `false`.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn is_listening(&self, url: &str) -> bool;
}
