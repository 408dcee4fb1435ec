//! TeamsChannel - posts the report as an Adaptive Card to an incoming webhook

use async_trait::async_trait;
use contracts::{ChannelError, NotificationChannel, Report, TeamsConfig};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::truncate_body;

const CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const CARD_VERSION: &str = "1.4";
const CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Webhook payload
#[derive(Debug, Clone, Serialize)]
pub struct TeamsMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: &'static str,
    pub content: AdaptiveCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: &'static str,
    pub msteams: MsTeams,
    pub body: Vec<CardElement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MsTeams {
    pub width: &'static str,
}

/// Body elements, tagged by their Adaptive Card type
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock(TextBlock),
    ColumnSet { columns: Vec<Column> },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    pub wrap: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename = "Column")]
pub struct Column {
    pub width: &'static str,
    pub items: Vec<CardElement>,
}

impl TextBlock {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wrap: true,
            ..Default::default()
        }
    }

    fn bolder(text: impl Into<String>, size: Option<&'static str>) -> Self {
        Self {
            text: text.into(),
            weight: Some("bolder"),
            size,
            wrap: false,
        }
    }
}

fn table_row(name: TextBlock, count: TextBlock) -> CardElement {
    CardElement::ColumnSet {
        columns: vec![
            Column {
                width: "50",
                items: vec![CardElement::TextBlock(name)],
            },
            Column {
                width: "30",
                items: vec![CardElement::TextBlock(count)],
            },
        ],
    }
}

/// Build the card: header blocks followed by a Service Name / Count table
pub fn build_card(report: &Report) -> TeamsMessage {
    let mut body = vec![
        CardElement::TextBlock(TextBlock::bolder(
            format!("📢 **Report: {}**", report.name),
            Some("Large"),
        )),
        CardElement::TextBlock(TextBlock::plain(format!("📅 **Date:** {}", report.date))),
        CardElement::TextBlock(TextBlock::plain("---")),
        CardElement::TextBlock(TextBlock::bolder("**📌 Service Report:**", Some("Medium"))),
        table_row(
            TextBlock::bolder("Service Name", None),
            TextBlock::bolder("Count", None),
        ),
    ];

    body.extend(report.services.iter().map(|service| {
        table_row(
            TextBlock::plain(service.name.as_str()),
            TextBlock::plain(service.count.to_string()),
        )
    }));

    TeamsMessage {
        kind: "message",
        attachments: vec![Attachment {
            content_type: CARD_CONTENT_TYPE,
            content: AdaptiveCard {
                schema: CARD_SCHEMA,
                kind: "AdaptiveCard",
                version: CARD_VERSION,
                msteams: MsTeams { width: "Full" },
                body,
            },
        }],
    }
}

/// Channel that posts to a Teams incoming webhook
pub struct TeamsChannel {
    name: String,
    config: TeamsConfig,
    http: reqwest::Client,
}

impl TeamsChannel {
    pub fn new(name: impl Into<String>, config: TeamsConfig) -> Self {
        Self {
            name: name.into(),
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationChannel for TeamsChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "teams_channel_send",
        skip(self, report),
        fields(channel = %self.name, report_id = report.id)
    )]
    async fn send(&self, report: &Report) -> Result<(), ChannelError> {
        let settings = self
            .config
            .resolve()
            .map_err(|missing| ChannelError::missing_settings(&self.name, &missing.0))?;

        let message = build_card(report);
        debug!(
            channel = %self.name,
            services = report.services.len(),
            "Posting adaptive card"
        );

        let resp = self
            .http
            .post(settings.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| ChannelError::transport(&self.name, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::upstream_status(
                &self.name,
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        info!(channel = %self.name, status = status.as_u16(), "Report posted to Teams");
        Ok(())
    }
}
