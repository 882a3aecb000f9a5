//! Audio Queries - 音频查询

/// 按定位符获取音频
#[derive(Debug, Clone)]
pub struct GetAudioQuery {
    /// 客户端传入的原始定位符，尚未校验
    pub locator: String,
}

/// 获取音频响应
#[derive(Debug, Clone)]
pub struct GetAudioResponse {
    pub audio_data: Vec<u8>,
    pub content_type: &'static str,
}
