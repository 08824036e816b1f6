use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::memory::StoreRequest;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreMemoryParams {
    #[schemars(description = "Owner of the memory. All queries are scoped to one user.")]
    pub user_id: String,

    #[schemars(description = "The message text of this conversational turn")]
    pub message: String,

    #[schemars(description = "Who produced the turn: 'user', 'companion', 'agent' or 'system'")]
    pub sender: String,

    #[schemars(
        description = "Optional emotional state as 'Emotion:Intensity', e.g. 'Happy:Medium'. Case-sensitive."
    )]
    pub emotional_state: Option<String>,

    #[schemars(
        description = "Optional ASEKE cognitive focus code: KS, CE, IS, KI, KP, ESA, SDA or Learning"
    )]
    pub cognitive_focus: Option<String>,

    #[schemars(description = "Optional conversation thread id")]
    pub session_id: Option<String>,
}

impl From<StoreMemoryParams> for StoreRequest {
    fn from(p: StoreMemoryParams) -> Self {
        Self {
            user_id: p.user_id,
            text: p.message,
            sender: p.sender,
            emotional_state: p.emotional_state,
            cognitive_focus: p.cognitive_focus,
            session_id: p.session_id,
        }
    }
}
