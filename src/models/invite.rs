/// A composed meeting invitation ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub from_name: String,
    pub from_address: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}
