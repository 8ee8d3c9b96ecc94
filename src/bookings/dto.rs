use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /book`. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    #[serde(default)]
    pub trainer_id: String,
    #[serde(default)]
    pub class_id: String,
    /// Raw price text; JSON clients may send a number.
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
    /// Trainer display name, echoed on the success page.
    #[serde(default)]
    pub trainer: String,
    /// Class display name, echoed on the success page.
    #[serde(default, rename = "class")]
    pub class_name: String,
    pub date: Option<String>,
    pub time_slot: Option<String>,
}

fn price_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

/// `date`/`timeSlot` may also come in the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    pub date: Option<String>,
    pub time_slot: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
