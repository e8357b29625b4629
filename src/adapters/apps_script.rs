use crate::domain::model::SheetRefreshOutcome;
use crate::domain::ports::SheetRefresher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Google Apps Script 部署端點。
///
/// 回應內容刻意不讀取：只能確認請求是否送達，無法得知試算表是否真的更新。
pub struct AppsScriptClient {
    client: Client,
    url: Url,
}

impl AppsScriptClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: Url::parse(url)?,
        })
    }

    fn update_view_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("action", "updateview");
        url
    }
}

#[async_trait]
impl SheetRefresher for AppsScriptClient {
    async fn refresh_sheet_view(&self) -> SheetRefreshOutcome {
        let url = self.update_view_url();
        tracing::debug!("Requesting sheet view update: {}", url);

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::debug!("Apps Script answered with HTTP {}", status);
                SheetRefreshOutcome::RequestSent {
                    status: Some(status),
                }
            }
            Err(e) => {
                tracing::error!("❌ Sheet view request failed: {}", e);
                SheetRefreshOutcome::RequestFailed(e.to_string())
            }
        }
    }
}
