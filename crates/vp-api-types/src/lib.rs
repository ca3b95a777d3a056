use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_SIZE: u32 = 512;
pub const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;
pub const MIN_GUIDANCE_SCALE: f32 = 1.0;
pub const MAX_GUIDANCE_SCALE: f32 = 15.0;

/// Local-storage / flag-store key that remembers a previous wallet connection.
pub const WALLET_CONNECTED_KEY: &str = "walletConnected";
pub const WALLET_CONNECTED_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Upload,
    Prompt,
    Generating,
    Result,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: String::new(),
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletPublicKey(pub String);

impl WalletPublicKey {
    /// `8gLC...EGxN` form used on the wallet button.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return self.0.clone();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: String,
    pub image_url: String,
    pub title: String,
    pub prompt: String,
    pub created_at: String,
    pub likes: u32,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintResult {
    pub mint_address: String,
    pub tx_signature: String,
    pub metadata_pda: String,
    pub associated_token_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WalletStatusResponse {
    pub connected: bool,
    pub connecting: bool,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConnectResponse {
    pub status: WalletStatusResponse,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFile {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub accepted: usize,
    pub message: String,
    pub snapshot: WizardSnapshot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub guidance_scale: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub settings: GenerationSettings,
    pub file_names: Vec<String>,
    pub image_preview: Option<String>,
    pub generated_image: Option<String>,
    pub progress: f32,
    pub progress_caption: Option<String>,
    pub is_generating: bool,
    pub is_minting: bool,
    pub mint_result: Option<MintResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    pub mint_result: MintResult,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub image_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_reset_values() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.prompt, "");
        assert_eq!(settings.negative_prompt, "");
        assert_eq!(settings.width, 512);
        assert_eq!(settings.height, 512);
        assert_eq!(settings.guidance_scale, 7.5);
    }

    #[test]
    fn public_key_shortens_to_head_and_tail() {
        let key = WalletPublicKey("8gLCj6jAM4YBis8HpZWnSL9xVFnZRbP8Sbf6VHNdEGxN".to_owned());
        assert_eq!(key.short(), "8gLC...EGxN");

        let tiny = WalletPublicKey("abc".to_owned());
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn wizard_step_serializes_snake_case() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&WizardStep::Generating)?, "\"generating\"");
        let step: WizardStep = serde_json::from_str("\"result\"")?;
        assert_eq!(step, WizardStep::Result);
        Ok(())
    }
}
