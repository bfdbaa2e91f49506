use serde::Deserialize;

use crate::models::invite::Invitation;

pub const SENDER_DISPLAY_NAME: &str = "Tyme";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub sender_name: String,
    #[serde(default)]
    pub sender_email: String,
    pub recipient_emails: String,
    pub meeting_link: String,
    #[serde(default)]
    pub description: String,
    pub meeting_time: String,
    pub meeting_date: String,
    pub timezone: String,
}

/// Comma separated list, trimmed, empties dropped, sender appended when absent.
pub fn collect_recipients(recipient_emails: &str, sender_email: &str) -> Vec<String> {
    let mut recipients: Vec<String> = recipient_emails
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect();
    let sender = sender_email.trim();
    if !sender.is_empty() && !recipients.iter().any(|r| r.eq_ignore_ascii_case(sender)) {
        recipients.push(sender.to_string());
    }
    recipients
}

pub fn compose_invitation(request: &InviteRequest, from_address: &str) -> Invitation {
    let recipients = collect_recipients(&request.recipient_emails, &request.sender_email);
    let when = format!("{} at {} {}", request.meeting_date, request.meeting_time, request.timezone);

    let text_body = format!(
        "{sender} has invited you for a meeting on {when}.\n\n\
         Meeting Link: {link}\n\n\
         Meeting Details:\n{details}\n\n\
         Participants:\n{participants}",
        sender = request.sender_name,
        when = when,
        link = request.meeting_link,
        details = request.description,
        participants = recipients.join("\n"),
    );

    let participant_items: String = recipients
        .iter()
        .map(|email| format!("<li style=\"margin: 5px 0;\">{}</li>", escape_html(email)))
        .collect();
    let html_body = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #333;\">Meeting Invitation</h2>\
         <p><strong>{sender}</strong> has invited you for a meeting.</p>\
         <div style=\"background-color: #f5f5f5; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
         <p><strong>Date:</strong> {date}</p>\
         <p><strong>Time:</strong> {time} {timezone}</p>\
         <p><strong>Meeting Link:</strong> <a href=\"{link}\" style=\"color: #0066cc;\">{link}</a></p>\
         </div>\
         <div style=\"margin: 20px 0;\"><h3 style=\"color: #444;\">Meeting Details:</h3>\
         <p style=\"white-space: pre-wrap;\">{details}</p></div>\
         <div style=\"margin: 20px 0;\"><h3 style=\"color: #444;\">Participants:</h3>\
         <ul style=\"list-style: none; padding: 0;\">{participants}</ul></div>\
         <div style=\"margin-top: 30px; font-size: 12px; color: #666;\">\
         <p>This invitation was sent using Tyme.</p></div>\
         </div>",
        sender = escape_html(&request.sender_name),
        date = escape_html(&request.meeting_date),
        time = escape_html(&request.meeting_time),
        timezone = escape_html(&request.timezone),
        link = escape_html(&request.meeting_link),
        details = escape_html(&request.description),
        participants = participant_items,
    );

    Invitation {
        from_name: SENDER_DISPLAY_NAME.to_string(),
        from_address: from_address.to_string(),
        recipients,
        subject: format!("Meeting Invitation: {}", when),
        text_body,
        html_body,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> InviteRequest {
        InviteRequest {
            sender_name: "Ada <admin>".into(),
            sender_email: "ada@example.com".into(),
            recipient_emails: " bob@example.com, ,carol@example.com ".into(),
            meeting_link: "https://meet.google.com/abc-defg-hij".into(),
            description: "Quarterly review".into(),
            meeting_time: "10:00 AM".into(),
            meeting_date: "28 May".into(),
            timezone: "Europe/London".into(),
        }
    }

    #[test]
    fn recipients_are_cleaned_and_include_sender() {
        assert_eq!(
            collect_recipients(" bob@example.com, ,carol@example.com ", "ada@example.com"),
            vec!["bob@example.com", "carol@example.com", "ada@example.com"]
        );
        assert_eq!(
            collect_recipients("ADA@example.com", "ada@example.com"),
            vec!["ADA@example.com"]
        );
        assert!(collect_recipients(" , ", "").is_empty());
    }

    #[test]
    fn invitation_carries_subject_and_bodies() {
        let invitation = compose_invitation(&request(), "bot@example.com");
        assert_eq!(invitation.subject, "Meeting Invitation: 28 May at 10:00 AM Europe/London");
        assert_eq!(invitation.from_name, "Tyme");
        assert_eq!(invitation.recipients.len(), 3);
        assert!(invitation.text_body.starts_with("Ada <admin> has invited you"));
        assert!(invitation.text_body.contains("Meeting Link: https://meet.google.com/abc-defg-hij"));
        assert!(invitation.html_body.contains("Ada &lt;admin&gt;"));
        assert!(invitation.html_body.contains("<li style=\"margin: 5px 0;\">carol@example.com</li>"));
    }
}
