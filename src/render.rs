//! HTML fragments for notifications.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::notification::{Message, Notification};

static MESSAGE_TEMPLATE: &str = r#"<span class="DfActivityMsg">
{%- if aggregation %}{{ aggregation }} {% endif -%}
{{ text }}
{%- if preview %} <a href="{{ preview.path }}">{{ preview.label }}</a>{% endif -%}
</span>"#;

static NOTIFICATION_TEMPLATE: &str = r#"<div class="DfNotificationItem">
{%- if image %}<img class="DfNotificationImage" src="{{ image }}">{% endif -%}
<div class="DfNotificationContent">
<a class="DfActor" href="/accounts/{{ address }}">{{ name }}</a> {{ message|safe }}
<div class="DfDate"><a href="{{ link }}">{{ details }}</a></div>
</div></div>"#;

#[derive(Serialize)]
struct PreviewView<'a> {
    label: &'a str,
    path: &'a str,
}

pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<HtmlRenderer> {
        let mut env = Environment::new();
        // The .html names turn on HTML auto-escaping.
        env.add_template("message.html", MESSAGE_TEMPLATE)?;
        env.add_template("notification.html", NOTIFICATION_TEMPLATE)?;
        Ok(HtmlRenderer { env })
    }

    pub fn message(&self, message: &Message) -> Result<String> {
        let preview = message.preview.as_ref().map(|p| PreviewView {
            label: p.label(),
            path: p.path(),
        });
        let template = self.env.get_template("message.html")?;
        template
            .render(context! {
                aggregation => message.aggregation,
                text => message.text,
                preview => preview,
            })
            .context("unable to render message")
    }

    pub fn notification(&self, notification: &Notification) -> Result<String> {
        let message = self.message(&notification.message)?;
        let name = notification
            .owner
            .as_ref()
            .and_then(|profile| profile.content.as_ref())
            .and_then(|content| content.name.as_deref())
            .unwrap_or(notification.address.as_str());
        let template = self.env.get_template("notification.html")?;
        template
            .render(context! {
                image => notification.image,
                address => notification.address.as_str(),
                name => name,
                message => message,
                link => notification.link.path,
                details => notification.details,
            })
            .context("unable to render notification")
    }
}
