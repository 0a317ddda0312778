use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// How a connection fee is being settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    /// Paid in full at installation.
    Upfront,
    /// Down payment plus up to six installments.
    Financed,
    /// Fee for re-activating a suspended connection.
    Reconnection,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Upfront => "upfront",
            PaymentKind::Financed => "financed",
            PaymentKind::Reconnection => "reconnection",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upfront" => Some(PaymentKind::Upfront),
            "financed" => Some(PaymentKind::Financed),
            "reconnection" => Some(PaymentKind::Reconnection),
            _ => None,
        }
    }
}

/// A connection or reconnection fee payment record for one service.
///
/// `down_payment` plus the recorded installments never exceeds `total`;
/// both the repository and a schema CHECK enforce it.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionPayment {
    pub payment_id: Uuid,
    pub service_id: Uuid,
    pub kind: String,
    pub issued_utc: DateTime<Utc>,
    pub total: Decimal,
    pub down_payment: Decimal,
    pub installment_1: Decimal,
    pub installment_2: Decimal,
    pub installment_3: Decimal,
    pub installment_4: Decimal,
    pub installment_5: Decimal,
    pub installment_6: Decimal,
}

impl ConnectionPayment {
    pub fn installments(&self) -> [Decimal; 6] {
        [
            self.installment_1,
            self.installment_2,
            self.installment_3,
            self.installment_4,
            self.installment_5,
            self.installment_6,
        ]
    }

    /// Down payment plus every recorded installment.
    pub fn paid_total(&self) -> Decimal {
        self.down_payment + self.installments().iter().sum::<Decimal>()
    }

    /// Remaining balance owed on the fee.
    pub fn outstanding(&self) -> Decimal {
        self.total - self.paid_total()
    }
}

/// A payment joined with its service connection and owning client.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentWithParties {
    pub payment_id: Uuid,
    pub service_id: Uuid,
    pub kind: String,
    pub issued_utc: DateTime<Utc>,
    pub total: Decimal,
    pub down_payment: Decimal,
    pub installment_1: Decimal,
    pub installment_2: Decimal,
    pub installment_3: Decimal,
    pub installment_4: Decimal,
    pub installment_5: Decimal,
    pub installment_6: Decimal,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub service_active: bool,
    pub service_previous_reading: i64,
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
}

impl PaymentWithParties {
    pub fn paid_total(&self) -> Decimal {
        self.down_payment
            + self.installment_1
            + self.installment_2
            + self.installment_3
            + self.installment_4
            + self.installment_5
            + self.installment_6
    }

    pub fn outstanding(&self) -> Decimal {
        self.total - self.paid_total()
    }
}

/// Input for recording a connection payment; installments start at zero.
#[derive(Debug, Clone)]
pub struct CreateConnectionPayment {
    pub service_id: Uuid,
    pub kind: PaymentKind,
    pub total: Decimal,
    pub down_payment: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).expect("valid decimal literal")
    }

    fn payment(total: &str, down: &str, installments: [&str; 6]) -> ConnectionPayment {
        ConnectionPayment {
            payment_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            kind: PaymentKind::Financed.as_str().to_string(),
            issued_utc: Utc::now(),
            total: dec(total),
            down_payment: dec(down),
            installment_1: dec(installments[0]),
            installment_2: dec(installments[1]),
            installment_3: dec(installments[2]),
            installment_4: dec(installments[3]),
            installment_5: dec(installments[4]),
            installment_6: dec(installments[5]),
        }
    }

    #[test]
    fn paid_total_sums_down_payment_and_installments() {
        let p = payment("250.00", "100.00", ["25.00", "25.00", "0", "0", "0", "0"]);
        assert_eq!(p.paid_total(), dec("150.00"));
        assert_eq!(p.outstanding(), dec("100.00"));
    }

    #[test]
    fn fully_paid_payment_has_zero_outstanding() {
        let p = payment(
            "250.00",
            "100.00",
            ["25.00", "25.00", "25.00", "25.00", "25.00", "25.00"],
        );
        assert_eq!(p.outstanding(), Decimal::ZERO);
    }

    #[test]
    fn payment_kind_round_trips_through_strings() {
        for kind in [
            PaymentKind::Upfront,
            PaymentKind::Financed,
            PaymentKind::Reconnection,
        ] {
            assert_eq!(PaymentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PaymentKind::parse("cash"), None);
    }
}
