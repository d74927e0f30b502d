//! 服务探测 - 业务能力层
//!
//! 可用性检查和统计查询。两者都不会返回错误：失败分别表示为 `false` 和 `None`。

use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::transport::{STATS_PATH, STATUS_PATH};
use crate::clients::{ApiClient, CredentialProvider, Transport};
use crate::models::evaluation::Statistics;

/// 统计接口可能包一层 `{success, data}`
#[derive(Deserialize)]
#[serde(untagged)]
enum StatsBody {
    Bare(Statistics),
    Wrapped { data: Statistics },
}

/// 检查评估服务是否可用（2xx 即可用）
pub async fn check_availability<T, C>(client: &ApiClient<T, C>) -> bool
where
    T: Transport,
    C: CredentialProvider,
{
    match client.get(STATUS_PATH).await {
        Ok(response) => {
            debug!("可用性检查返回状态码 {}", response.status);
            response.is_success()
        }
        Err(e) => {
            warn!("⚠️ 评估服务不可用: {}", e);
            false
        }
    }
}

/// 获取服务端累计统计
pub async fn get_statistics<T, C>(client: &ApiClient<T, C>) -> Option<Statistics>
where
    T: Transport,
    C: CredentialProvider,
{
    let response = match client.get(STATS_PATH).await {
        Ok(response) => response,
        Err(e) => {
            warn!("⚠️ 获取统计失败: {}", e);
            return None;
        }
    };

    if !response.is_success() {
        warn!("⚠️ 获取统计失败: HTTP {}", response.status);
        return None;
    }

    match serde_json::from_str::<StatsBody>(&response.body) {
        Ok(StatsBody::Bare(stats)) | Ok(StatsBody::Wrapped { data: stats }) => Some(stats),
        Err(e) => {
            warn!("⚠️ 统计响应无法解析: {}", e);
            None
        }
    }
}
