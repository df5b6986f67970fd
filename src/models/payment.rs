//! Modelo de Payment
//!
//! Pagos de sólo lectura. El importe viaja en unidades menores (paise).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "stripeSessionId")]
    pub session_id: Option<String>,
}

impl Payment {
    /// Importe en unidades mayores (rupias)
    pub fn amount_major(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }
}

/// Referencia a un pago: poblado o sólo el identificador
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentRef {
    Populated(Payment),
    Id(String),
}

impl PaymentRef {
    pub fn id(&self) -> &str {
        match self {
            PaymentRef::Populated(p) => &p.id,
            PaymentRef::Id(id) => id,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            PaymentRef::Populated(p) => p.session_id.as_deref(),
            PaymentRef::Id(_) => None,
        }
    }

    pub fn details(&self) -> Option<&Payment> {
        match self {
            PaymentRef::Populated(p) => Some(p),
            PaymentRef::Id(_) => None,
        }
    }
}
