pub const COMMOTION_API_KEY: &str = "COMMOTION_API_KEY";
pub const COMMOTION_MODEL: &str = "COMMOTION_MODEL";
pub const COMMOTION_VOICE: &str = "COMMOTION_VOICE";
pub const COMMOTION_TEMPERATURE: &str = "COMMOTION_TEMPERATURE";

pub const BASE_URL: &str = "wss://voice-agent-realtime.models.gocommotion.com/v1";
pub const DEFAULT_MODEL: &str = "commotion-medium";
pub const DEFAULT_VOICE: &str = "tara";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
