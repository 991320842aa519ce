//! Built-in tools
//!
//! | Tool | Side effect |
//! |------|-------------|
//! | `addTwoNumbers` | none |
//! | `calculate-bmi` | none |
//! | `createPost` | [`SocialPublisher`] |
//! | `sendEmail` | [`MailTransport`] |
//! | `generatePdf` | [`DocumentRenderer`] |
//! | `editPDF` | [`DocumentRenderer`] |

/// Typed argument parsing
pub mod args;
/// `addTwoNumbers` and `calculate-bmi`
pub mod arithmetic;
/// `generatePdf` and `editPDF`
pub mod document;
/// `sendEmail`
pub mod mail;
/// `createPost`
pub mod social;

use relay_domain::ports::{DocumentRenderer, MailTransport, SocialPublisher, ToolExecutor};
use relay_domain::value_objects::ParameterSchema;
use std::sync::Arc;

pub use arithmetic::{ADD_TWO_NUMBERS, AddTwoNumbers, CALCULATE_BMI, CalculateBmi};
pub use document::{EDIT_PDF, EditPdf, GENERATE_PDF, GeneratePdf, markdown_to_plain_text};
pub use mail::{SEND_EMAIL, SendEmail};
pub use social::{CREATE_POST, CreatePost, MAX_POST_LENGTH};

/// Side-effect adapters the built-in tools run against
#[derive(Clone)]
pub struct ToolServices {
    /// Email delivery
    pub mail: Arc<dyn MailTransport>,
    /// Status publishing
    pub social: Arc<dyn SocialPublisher>,
    /// PDF rendering
    pub documents: Arc<dyn DocumentRenderer>,
}

/// A tool ready to be registered
pub struct BuiltinTool {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Parameter schema
    pub schema: ParameterSchema,
    /// Bound executor
    pub executor: Arc<dyn ToolExecutor>,
}

/// Every built-in tool, bound to the given services
pub fn builtin_tools(services: &ToolServices) -> Vec<BuiltinTool> {
    vec![
        BuiltinTool {
            name: ADD_TWO_NUMBERS,
            description: "Add two numbers",
            schema: AddTwoNumbers::schema(),
            executor: Arc::new(AddTwoNumbers),
        },
        BuiltinTool {
            name: CALCULATE_BMI,
            description: "BMI Calculator",
            schema: CalculateBmi::schema(),
            executor: Arc::new(CalculateBmi),
        },
        BuiltinTool {
            name: CREATE_POST,
            description: "Post on X",
            schema: CreatePost::schema(),
            executor: Arc::new(CreatePost::new(services.social.clone())),
        },
        BuiltinTool {
            name: SEND_EMAIL,
            description: "Send an Email",
            schema: SendEmail::schema(),
            executor: Arc::new(SendEmail::new(services.mail.clone())),
        },
        BuiltinTool {
            name: GENERATE_PDF,
            description: "Generate a PDF from plain text",
            schema: GeneratePdf::schema(),
            executor: Arc::new(GeneratePdf::new(services.documents.clone())),
        },
        BuiltinTool {
            name: EDIT_PDF,
            description: "Edit uploaded PDF and add text",
            schema: EditPdf::schema(),
            executor: Arc::new(EditPdf::new(services.documents.clone())),
        },
    ]
}
