pub mod context;
pub mod email;
pub mod error;
pub mod generation;
pub mod handler;
pub mod notification;
pub mod registry;
pub mod task;
pub mod webhook;

pub use context::RunContext;
pub use email::{EmailHandler, EmailMessage, MailTransport, SmtpConfig, SmtpMailTransport};
pub use error::ActionError;
pub use generation::{ContentGenerator, GenerationHandler, GenerationRequest};
pub use handler::{ActionHandler, Invocation};
pub use notification::{Notification, NotificationHandler, NotificationSink, RecordingSink};
pub use registry::HandlerRegistry;
pub use task::TaskHandler;
pub use webhook::WebhookHandler;
