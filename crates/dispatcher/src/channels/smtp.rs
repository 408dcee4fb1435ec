//! SmtpChannel - mails the report as an HTML table

use std::fmt::Write as _;

use async_trait::async_trait;
use contracts::{ChannelError, NotificationChannel, Report, SmtpConfig, SmtpSettings};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument};

/// Port that expects TLS from the first byte instead of STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

/// Channel that sends one HTML mail per recipient
pub struct SmtpChannel {
    name: String,
    config: SmtpConfig,
}

impl SmtpChannel {
    pub fn new(name: impl Into<String>, config: SmtpConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    fn parse_address(&self, setting: &str, raw: &str) -> Result<Address, ChannelError> {
        raw.trim().parse::<Address>().map_err(|e| {
            ChannelError::configuration(&self.name, format!("invalid {setting} '{raw}': {e}"))
        })
    }

    /// Sender and every recipient, parsed before anything is sent
    fn mailboxes(&self, settings: &SmtpSettings<'_>) -> Result<(Mailbox, Vec<Mailbox>), ChannelError> {
        let from = Mailbox::new(
            settings.from_name.map(str::to_string),
            self.parse_address("SMTP_FROM_EMAIL", settings.from_email)?,
        );

        let recipients = settings
            .recipients
            .iter()
            .filter(|r| !r.trim().is_empty())
            .map(|r| {
                self.parse_address("SMTP_TO_EMAIL", r)
                    .map(|address| Mailbox::new(None, address))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((from, recipients))
    }

    fn transport(
        &self,
        settings: &SmtpSettings<'_>,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, ChannelError> {
        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(settings.host)
        }
        .map_err(|e| ChannelError::configuration(&self.name, format!("SMTP_HOST: {e}")))?;

        Ok(builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.to_string(),
                settings.password.to_string(),
            ))
            .build())
    }
}

/// Render the report as an HTML document with one table row per service
pub fn render_html(report: &Report) -> String {
    let mut rows = String::new();
    for (index, service) in report.services.iter().enumerate() {
        // write! on a String cannot fail
        let _ = writeln!(
            rows,
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            index + 1,
            escape_html(&service.name),
            escape_html(&service.path),
            service.count
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; }}
        table {{ width: 100%; border-collapse: collapse; margin-top: 10px; }}
        th, td {{ border: 1px solid black; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
    </style>
</head>
<body>
    <h2>{name}</h2>
    <p><strong>Report Date:</strong> {date}</p>
    <table>
        <thead>
            <tr>
                <th>#</th>
                <th>Service Name</th>
                <th>Service Path</th>
                <th>Count</th>
            </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
</body>
</html>
"#,
        name = escape_html(&report.name),
        date = escape_html(&report.date),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl NotificationChannel for SmtpChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "smtp_channel_send",
        skip(self, report),
        fields(channel = %self.name, report_id = report.id)
    )]
    async fn send(&self, report: &Report) -> Result<(), ChannelError> {
        let settings = self
            .config
            .resolve()
            .map_err(|missing| ChannelError::missing_settings(&self.name, &missing.0))?;

        let (from, recipients) = self.mailboxes(&settings)?;
        let transport = self.transport(&settings)?;
        let html = render_html(report);

        for to in recipients {
            let message = Message::builder()
                .from(from.clone())
                .to(to.clone())
                .subject(report.name.as_str())
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .map_err(|e| ChannelError::configuration(&self.name, e.to_string()))?;

            debug!(channel = %self.name, recipient = %to, "Sending report mail");

            transport.send(message).await.map_err(|e| {
                ChannelError::transport(&self.name, format!("{}: {e}", settings.host))
            })?;

            info!(channel = %self.name, recipient = %to, "Report mail sent");
        }

        Ok(())
    }
}
