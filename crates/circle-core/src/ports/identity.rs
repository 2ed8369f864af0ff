//! Identity port - 認証済みユーザーの参照
//!
//! 認証そのものは外部の責務です。ここではリクエストごとに
//! 「現在のユーザーがいるかどうか」だけを受け取ります。

use crate::domain::UserRef;

/// Supplies the current user for one request. `None` means "no viewer".
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<UserRef>;
}

/// No one is signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn current_user(&self) -> Option<UserRef> {
        None
    }
}

/// A fixed, already-authenticated user.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub UserRef);

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<UserRef> {
        Some(self.0.clone())
    }
}
