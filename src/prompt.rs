use serde::{Deserialize, Serialize};

use crate::hours::{self, BusinessHours};

/// Phrase shared by both "cannot answer" closing sentences.
pub const FALLBACK_MARKER: &str = "our team will follow up";

pub const OPEN_CLOSING: &str = "Thank you for your message. As an AI assistant, I currently do not have access to the specific information you’re requesting. Our team will follow up with you once we resume business hours.";

pub const CLOSED_CLOSING: &str = "Thank you for your message. As an AI assistant, I currently do not have access to the specific information you’re requesting. Our team will follow up with you once we reopen.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub business_name: String,
    pub specialty: String,
    pub address: String,
    pub maps_url: String,
    pub signature: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            business_name: "Smartfix Repair".to_string(),
            specialty: "a phone repair business specializing in Apple products, primarily iPhones"
                .to_string(),
            address: "Jalan Majapahit No. 83, Kuta, Badung, Bali".to_string(),
            maps_url: "https://maps.app.goo.gl/E6nHaKsVpRnP9Vd39".to_string(),
            signature: "**- Smartfix AI Customer Service**".to_string(),
        }
    }
}

pub fn system_prompt(persona: &Persona, schedule: &BusinessHours, open: bool) -> String {
    format!(
        "You are a helpful AI bot for {name}, {specialty}.\n\
         The shop is located at {address}. Google Maps: {maps}\n\
         \n\
         Only reply if the question can be answered with available knowledge. If the question cannot be answered, follow these rules:\n\
         - If it is during business hours ({schedule}), say: \"{open_closing}\"\n\
         - If it is outside business hours, say: \"{closed_closing}\"\n\
         \n\
         The shop is currently {state}.\n\
         \n\
         Always reply in the user's language. Be polite but not overly formal. Add \"{signature}\" at the end of each reply.\n\
         \n\
         Do not mention operating hours unless explicitly asked. If the user repeats a question that you couldn't answer before, do not reply again.",
        name = persona.business_name,
        specialty = persona.specialty,
        address = persona.address,
        maps = persona.maps_url,
        schedule = schedule.describe(),
        open_closing = OPEN_CLOSING,
        closed_closing = CLOSED_CLOSING,
        state = hours::label(open),
        signature = persona.signature,
    )
}

/// Whether the model answered with one of the "cannot answer" closings.
pub fn is_fallback(answer: &str) -> bool {
    answer.to_lowercase().contains(FALLBACK_MARKER)
}
