//! Steps of an order workflow run.

/// The step an order workflow run is in.
///
/// Runs move forward through the steps in declaration order and end in
/// either [`Done`](Self::Done) or [`Aborted`](Self::Aborted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStage {
    /// Checking the payload, no request sent yet
    #[default]
    Validating,
    SettingLeverage,
    SettingMarginMode,
    FetchingPrice,
    PlacingOrder,
    /// Polling open positions for the new position ID
    AwaitingPositionId,
    AttachingTakeProfits,
    AttachingStopLoss,
    Done,
    Aborted,
}

impl OrderStage {
    /// Human readable description, e.g. "setting leverage".
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStage::Validating => "validating",
            OrderStage::SettingLeverage => "setting leverage",
            OrderStage::SettingMarginMode => "setting margin mode",
            OrderStage::FetchingPrice => "fetching price",
            OrderStage::PlacingOrder => "placing order",
            OrderStage::AwaitingPositionId => "awaiting position id",
            OrderStage::AttachingTakeProfits => "attaching take profits",
            OrderStage::AttachingStopLoss => "attaching stop loss",
            OrderStage::Done => "done",
            OrderStage::Aborted => "aborted",
        }
    }

    /// Whether the run has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStage::Done | OrderStage::Aborted)
    }
}

impl std::fmt::Display for OrderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(OrderStage::SettingLeverage.to_string(), "setting leverage");
        assert_eq!(OrderStage::AwaitingPositionId.to_string(), "awaiting position id");
    }

    #[test]
    fn test_terminal_stages() {
        assert!(OrderStage::Done.is_terminal());
        assert!(OrderStage::Aborted.is_terminal());
        assert!(!OrderStage::PlacingOrder.is_terminal());
    }
}
