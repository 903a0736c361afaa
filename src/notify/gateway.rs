use bytes::Bytes;
use reqwest::multipart::{Form, Part};

/// WhatsApp JID suffix the gateway expects on every destination.
const WA_ADDRESS_DOMAIN: &str = "@s.whatsapp.net";

/// Thin client for the wa-gateway HTTP API.
#[derive(Clone)]
pub struct WaGateway {
    http: reqwest::Client,
    base_url: String,
}

impl WaGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn send_text(&self, destination: &str, message: &str) -> anyhow::Result<()> {
        let phone = normalize_destination(destination);
        let payload = serde_json::json!({
            "phone": phone,
            "message": message,
            "type": "text",
        });
        self.http
            .post(format!("{}/send/message", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn send_image(
        &self,
        destination: &str,
        caption: &str,
        image: Bytes,
    ) -> anyhow::Result<()> {
        let phone = normalize_destination(destination);
        let part = Part::bytes(image.to_vec())
            .file_name("bukti.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .text("phone", phone)
            .text("caption", caption.to_string())
            .text("type", "image")
            .part("image", part);
        self.http
            .post(format!("{}/send/image", self.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub fn normalize_destination(raw: &str) -> String {
    if raw.ends_with(WA_ADDRESS_DOMAIN) {
        raw.to_string()
    } else {
        format!("{raw}{WA_ADDRESS_DOMAIN}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_domain() {
        assert_eq!(
            normalize_destination("6289648186679"),
            "6289648186679@s.whatsapp.net"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let already = "6289648186679@s.whatsapp.net";
        assert_eq!(normalize_destination(already), already);
    }

    #[tokio::test]
    async fn send_text_to_unreachable_gateway_errors_without_panicking() {
        let gw = WaGateway::new("http://127.0.0.1:1");
        let err = gw.send_text("628", "halo").await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
