//! Marketplace: product listings and orders.
//!
//! A product can only list a lot whose latest lab record is marketable.
//! Stock moves when the seller accepts an order, not when it is placed.

use chrono::Utc;
use stts_core::entities::{Order, Product};
use stts_core::enums::{AuditAction, EntityType, LabStatus, OrderStatus, WorkflowAction};
use stts_core::ids::{PREFIX_ORDER, PREFIX_PRODUCT};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, parse_datetime, parse_enum, require_positive, require_text,
};
use crate::service::SttsService;
use crate::updates::market::ProductUpdate;
use crate::workflow::StatusChange;

const PRODUCT_COLS: &str =
    "id, seller_id, lot_number, name, price, quantity, unit, created_at, updated_at";

const ORDER_COLS: &str = "id, buyer_id, product_id, quantity, total_price, status, status_comment, \
     created_at, updated_at";

fn row_to_product(row: &libsql::Row) -> Result<Product, DatabaseError> {
    Ok(Product {
        id: row.get(0)?,
        seller_id: row.get(1)?,
        lot_number: row.get(2)?,
        name: row.get(3)?,
        price: row.get(4)?,
        quantity: row.get(5)?,
        unit: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn row_to_order(row: &libsql::Row) -> Result<Order, DatabaseError> {
    Ok(Order {
        id: row.get(0)?,
        buyer_id: row.get(1)?,
        product_id: row.get(2)?,
        quantity: row.get(3)?,
        total_price: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        status_comment: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub lot_number: String,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub unit: String,
}

impl SttsService {
    // -- Products --

    pub async fn create_product(&self, new: NewProduct) -> Result<Product, DatabaseError> {
        let seller_id = self.authorize(Permission::Trade)?.user_id.clone();
        let lot_number = require_text("lot number", &new.lot_number)?.to_string();
        let name = require_text("product name", &new.name)?.to_string();
        let unit = require_text("unit", &new.unit)?.to_string();
        require_positive("price", new.price)?;
        require_positive("quantity", new.quantity)?;

        let marketable = self
            .latest_lab_for_lot(&lot_number)
            .await?
            .is_some_and(|lab| lab.status == LabStatus::Marketable);
        if !marketable {
            return Err(DatabaseError::validation(format!(
                "lot {lot_number} has no marketable lab record"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PRODUCT).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO products ({PRODUCT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            libsql::params![
                id.as_str(),
                seller_id.as_str(),
                lot_number.as_str(),
                name.as_str(),
                new.price,
                new.quantity,
                unit.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::Product, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Product {
            id,
            seller_id,
            lot_number,
            name,
            price: new.price,
            quantity: new.quantity,
            unit,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Product, id))?;
        row_to_product(&row)
    }

    pub async fn list_products(
        &self,
        seller_id: Option<&str>,
        lot_number: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Product>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(seller_id) = seller_id {
            params.push(seller_id.into());
            conditions.push(format!("seller_id = ?{}", params.len()));
        }
        if let Some(lot) = lot_number {
            params.push(lot.trim().into());
            conditions.push(format!("lot_number = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PRODUCT_COLS} FROM products {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut products = Vec::new();
        while let Some(row) = rows.next().await? {
            products.push(row_to_product(&row)?);
        }
        Ok(products)
    }

    pub async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, DatabaseError> {
        let current = self.get_product(id).await?;
        self.authorize_owner(&current.seller_id)?;

        let mut sets = SetClauses::new();
        if let Some(ref name) = update.name {
            sets.push("name", require_text("product name", name)?.to_string());
        }
        if let Some(price) = update.price {
            sets.push("price", require_positive("price", price)?);
        }
        if let Some(quantity) = update.quantity {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(DatabaseError::validation(format!(
                    "product quantity cannot be {quantity}"
                )));
            }
            sets.push("quantity", quantity);
        }
        if let Some(ref unit) = update.unit {
            sets.push("unit", require_text("unit", unit)?.to_string());
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("products", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::Product,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_product(id).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_product(id).await?;
        self.authorize_owner(&current.seller_id)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM products WHERE id = ?1", [id]).await?;
        self.record_audit(&tx, EntityType::Product, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // -- Orders --

    /// Place an order against a listing. The quantity must be available now;
    /// stock is only taken when the seller accepts.
    pub async fn place_order(&self, product_id: &str, quantity: f64) -> Result<Order, DatabaseError> {
        let buyer_id = self.authorize(Permission::Trade)?.user_id.clone();
        require_positive("order quantity", quantity)?;
        let product = self.get_product(product_id).await?;
        if product.seller_id == buyer_id {
            return Err(DatabaseError::validation("sellers cannot order their own products"));
        }
        if quantity > product.quantity {
            return Err(DatabaseError::validation(format!(
                "only {} {} of {} available",
                product.quantity, product.unit, product.name
            )));
        }

        let total_price = quantity * product.price;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ORDER).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO orders ({ORDER_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8)"
            ),
            libsql::params![
                id.as_str(),
                buyer_id.as_str(),
                product.id.as_str(),
                quantity,
                total_price,
                OrderStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::Order, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Order {
            id,
            buyer_id,
            product_id: product.id,
            quantity,
            total_price,
            status: OrderStatus::Pending,
            status_comment: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Order, id))?;
        row_to_order(&row)
    }

    pub async fn list_orders(
        &self,
        buyer_id: Option<&str>,
        product_id: Option<&str>,
        status: Option<OrderStatus>,
        limit: u32,
    ) -> Result<Vec<Order>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(buyer_id) = buyer_id {
            params.push(buyer_id.into());
            conditions.push(format!("buyer_id = ?{}", params.len()));
        }
        if let Some(product_id) = product_id {
            params.push(product_id.into());
            conditions.push(format!("product_id = ?{}", params.len()));
        }
        if let Some(status) = status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ORDER_COLS} FROM orders {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut orders = Vec::new();
        while let Some(row) = rows.next().await? {
            orders.push(row_to_order(&row)?);
        }
        Ok(orders)
    }

    /// Seller (or an approver) accepts an order, taking the quantity out of
    /// the listing in the same transaction. An order that is no longer
    /// pending leaves the listing untouched.
    pub async fn accept_order(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<OrderStatus>, DatabaseError> {
        let order = self.get_order(id).await?;
        let product = self.get_product(&order.product_id).await?;
        self.authorize_owner(&product.seller_id)?;

        let tx = self.db().conn().transaction().await?;
        let change = self
            .transition_on::<Order>(&tx, id, WorkflowAction::Approve, comment, Vec::new())
            .await?;
        let taken = tx
            .execute(
                "UPDATE products SET quantity = quantity - ?1, updated_at = ?2
                 WHERE id = ?3 AND quantity >= ?1",
                libsql::params![order.quantity, Utc::now().to_rfc3339(), product.id.as_str()],
            )
            .await?;
        if taken == 0 {
            return Err(DatabaseError::validation(format!(
                "not enough {} left to fill order {id}",
                product.name
            )));
        }
        tx.commit().await?;
        Ok(change)
    }

    pub async fn reject_order(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<OrderStatus>, DatabaseError> {
        let order = self.get_order(id).await?;
        let product = self.get_product(&order.product_id).await?;
        self.authorize_owner(&product.seller_id)?;
        self.transition::<Order>(id, WorkflowAction::Reject, comment, Vec::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::lab::NewLabInspection;
    use crate::test_support::helpers::{Fixture, act_as, crop_with_stages, fixture};
    use pretty_assertions::assert_eq;

    /// Admin lists 100 kg of a marketable lot at 2.5 per kg.
    async fn listed(fx: &Fixture) -> Product {
        let crop = crop_with_stages(&fx.svc, &[]).await;
        let lab = fx
            .svc
            .create_lab_inspection(NewLabInspection {
                lot_number: "LOT-M1".into(),
                mother_lot: None,
                crop_variety_id: crop.varieties[0].id.clone(),
                quantity: 100.0,
            })
            .await
            .unwrap();
        fx.svc
            .db()
            .conn()
            .execute(
                "UPDATE lab_inspections SET status = 'marketable' WHERE id = ?1",
                [lab.id.as_str()],
            )
            .await
            .unwrap();
        fx.svc
            .create_product(NewProduct {
                lot_number: "LOT-M1".into(),
                name: "Longe 5 certified".into(),
                price: 2.5,
                quantity: 100.0,
                unit: "kg".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn product_needs_marketable_lot() {
        let fx = fixture().await;
        let result = fx
            .svc
            .create_product(NewProduct {
                lot_number: "LOT-NONE".into(),
                name: "Beans".into(),
                price: 1.0,
                quantity: 1.0,
                unit: "kg".into(),
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn order_cannot_exceed_stock() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let result = fx.svc.place_order(&product.id, 150.0).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn accept_decrements_stock() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let order = fx.svc.place_order(&product.id, 40.0).await.unwrap();
        assert!((order.total_price - 100.0).abs() < f64::EPSILON);

        act_as(&mut fx.svc, &fx.admin).await;
        let change = fx.svc.accept_order(&order.id, None).await.unwrap();
        assert_eq!(change.to, OrderStatus::Accepted);
        let product = fx.svc.get_product(&product.id).await.unwrap();
        assert!((product.quantity - 60.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn reject_leaves_stock() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let order = fx.svc.place_order(&product.id, 40.0).await.unwrap();

        // The buyer does not own the listing.
        assert!(matches!(
            fx.svc.reject_order(&order.id, None).await,
            Err(DatabaseError::NotPermitted(_))
        ));

        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc.reject_order(&order.id, Some("Out of season")).await.unwrap();
        let product = fx.svc.get_product(&product.id).await.unwrap();
        assert!((product.quantity - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn decided_order_cannot_be_decided_again() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let order = fx.svc.place_order(&product.id, 10.0).await.unwrap();

        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc.accept_order(&order.id, None).await.unwrap();

        let again = fx.svc.accept_order(&order.id, None).await;
        assert!(matches!(again, Err(DatabaseError::InvalidTransition { .. })));
        let rejected = fx.svc.reject_order(&order.id, None).await;
        assert!(matches!(rejected, Err(DatabaseError::InvalidTransition { .. })));

        let product = fx.svc.get_product(&product.id).await.unwrap();
        assert!((product.quantity - 90.0).abs() < f64::EPSILON);
        let order = fx.svc.get_order(&order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
    }

    #[tokio::test]
    async fn rejected_order_cannot_be_accepted() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let order = fx.svc.place_order(&product.id, 10.0).await.unwrap();

        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc.reject_order(&order.id, None).await.unwrap();
        let result = fx.svc.accept_order(&order.id, None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
        let product = fx.svc.get_product(&product.id).await.unwrap();
        assert!((product.quantity - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn accept_fails_when_stock_ran_out() {
        let mut fx = fixture().await;
        let product = listed(&fx).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let first = fx.svc.place_order(&product.id, 80.0).await.unwrap();
        let second = fx.svc.place_order(&product.id, 80.0).await.unwrap();

        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc.accept_order(&first.id, None).await.unwrap();
        let result = fx.svc.accept_order(&second.id, None).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        let order = fx.svc.get_order(&second.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
