//! Terminal presentation collaborators.
//!
//! The request pipeline stays free of presentation concerns; two traits
//! cover the side effects the storefront UI needs: transient success/error
//! notices (the web client's toast) and sending the user to the login
//! entry point after logout or session expiry. Both are injectable so
//! command handlers can be exercised with test doubles.

/// Kind of notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-facing notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Sends the user to the login entry point.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Notifier printing to the terminal. Success goes to stdout, errors to
/// stderr so piped output stays clean.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => println!("✅ {}", message),
            NoticeKind::Error => eprintln!("❌ {}", message),
        }
    }
}

/// Navigator pointing at the CLI login command.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn to_login(&self) {
        eprintln!("Run `glam login <email> --password <password>` to sign in.");
    }
}
