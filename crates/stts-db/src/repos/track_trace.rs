//! Public lot lookup.

use stts_core::responses::{SeedDetails, TrackTraceResult};

use crate::error::DatabaseError;
use crate::helpers::require_text;
use crate::service::SttsService;

impl SttsService {
    /// Trace a lot through stock, labels and the seed lab.
    ///
    /// Read-only and open to anonymous callers. An unknown lot yields a
    /// result with every part empty.
    pub async fn track_lot(&self, lot_number: &str) -> Result<TrackTraceResult, DatabaseError> {
        let lot_number = require_text("lot number", lot_number)?;

        let stock = self.latest_stock_for_lot(lot_number).await?;
        let label = self.latest_issued_label_for_lot(lot_number).await?;
        let seed_details = (stock.is_some() || label.is_some()).then_some(SeedDetails { stock, label });

        let lab_record = self.latest_lab_for_lot(lot_number).await?;
        let mother_lot = match lab_record.as_ref().and_then(|lab| lab.mother_lot.as_deref()) {
            Some(mother) => self.latest_lab_for_lot(mother).await?,
            None => None,
        };

        tracing::debug!(
            lot_number,
            seed_details = seed_details.is_some(),
            lab_record = lab_record.is_some(),
            mother_lot = mother_lot.is_some(),
            "lot traced"
        );
        Ok(TrackTraceResult {
            lot_number: lot_number.to_string(),
            seed_details,
            lab_record,
            mother_lot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::stock::NewStockRecord;
    use crate::test_support::helpers::{Fixture, crop_with_stages, fixture};
    use pretty_assertions::assert_eq;
    use stts_core::enums::SeedClass;

    #[tokio::test]
    async fn blank_lot_is_rejected() {
        let Fixture { svc, .. } = fixture().await;
        assert!(matches!(
            svc.track_lot("   ").await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_lot_is_empty() {
        let Fixture { mut svc, .. } = fixture().await;
        svc.set_actor(None);
        let result = svc.track_lot("LOT-404").await.unwrap();
        assert_eq!(result.lot_number, "LOT-404");
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn stock_alone_fills_seed_details() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &[]).await;
        svc.create_stock_record(NewStockRecord {
            lot_number: "LOT-T1".into(),
            crop_variety_id: crop.varieties[0].id.clone(),
            seed_class: SeedClass::Qds,
            quantity: 12.0,
            source: None,
        })
        .await
        .unwrap();

        let result = svc.track_lot("LOT-T1").await.unwrap();
        let details = result.seed_details.unwrap();
        assert!(details.stock.is_some());
        assert!(details.label.is_none());
        assert!(result.lab_record.is_none());
    }
}
