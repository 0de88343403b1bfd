pub mod mailer;
pub mod notify;
pub mod revision;

pub use mailer::{ConsoleMailer, EmailMessage, Mailer, MailerError, MemoryMailer, SmtpMailer};
pub use revision::Revision;
