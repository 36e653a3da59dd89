use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::catalog::ProductSnapshot;
use crate::domain::errors::DomainError;
use crate::domain::ports::{OrderStore, ProductCatalog, PurchaseRecord};

/// Item-based collaborative filtering over historical purchases, with a
/// deterministic catalog fallback for thin or missing history.
pub struct RecommendEngine<S, C> {
    store: S,
    catalog: C,
}

impl<S, C> RecommendEngine<S, C>
where
    S: OrderStore,
    C: ProductCatalog,
{
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Rank up to `limit` products to show next to `target`. Read-only.
    pub fn recommend(&self, target: Uuid, limit: usize) -> Result<Vec<Uuid>, DomainError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let history = self.store.purchase_history()?;
        let purchasable = self.catalog.purchasable_products()?;

        let matrix = purchase_matrix(&history);
        let scores = similarity_scores(target, &matrix);
        let mut picked = rank(target, &scores, &purchasable, limit);

        if picked.len() < limit {
            let anchor_category = self.catalog.find_product(target)?.map(|p| p.category_id);
            fill_with_fallback(&mut picked, target, anchor_category, &purchasable, limit);
        }

        log::debug!("recommending {} products for {}", picked.len(), target);
        Ok(picked)
    }
}

/// Fold purchase records into `user -> set(product)`.
fn purchase_matrix(records: &[PurchaseRecord]) -> HashMap<Uuid, HashSet<Uuid>> {
    let mut matrix: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for record in records {
        matrix
            .entry(record.user_id)
            .or_default()
            .insert(record.product_id);
    }
    matrix
}

/// Cosine similarity over binary purchase vectors:
/// `|U(target) ∩ U(p)| / (sqrt(|U(target)|) * sqrt(|U(p)|))`,
/// with `|U(p)|` the global purchaser count of `p`.
fn similarity_scores(
    target: Uuid,
    matrix: &HashMap<Uuid, HashSet<Uuid>>,
) -> HashMap<Uuid, f64> {
    let target_users: Vec<&HashSet<Uuid>> = matrix
        .values()
        .filter(|products| products.contains(&target))
        .collect();
    if target_users.is_empty() {
        return HashMap::new();
    }

    let mut global_counts: HashMap<Uuid, usize> = HashMap::new();
    for products in matrix.values() {
        for product in products {
            *global_counts.entry(*product).or_default() += 1;
        }
    }

    let mut common: HashMap<Uuid, usize> = HashMap::new();
    for products in &target_users {
        for product in products.iter() {
            if *product != target {
                *common.entry(*product).or_default() += 1;
            }
        }
    }

    let target_norm = (target_users.len() as f64).sqrt();
    common
        .into_iter()
        .map(|(product, count)| {
            let global = global_counts[&product] as f64;
            (product, count as f64 / (target_norm * global.sqrt()))
        })
        .collect()
}

/// Scored candidates that are still purchasable, best first. Ties break on
/// newest creation time, then product id, so the output is a total order.
fn rank(
    target: Uuid,
    scores: &HashMap<Uuid, f64>,
    purchasable: &[ProductSnapshot],
    limit: usize,
) -> Vec<Uuid> {
    let mut scored: Vec<(&ProductSnapshot, f64)> = purchasable
        .iter()
        .filter(|p| p.id != target)
        .filter_map(|p| scores.get(&p.id).map(|score| (p, *score)))
        .collect();
    scored.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.into_iter().take(limit).map(|(p, _)| p.id).collect()
}

/// Two-tier pad: same-category purchasable products by recency, then any
/// category by recency, skipping the target and anything already picked.
fn fill_with_fallback(
    picked: &mut Vec<Uuid>,
    target: Uuid,
    anchor_category: Option<Uuid>,
    purchasable: &[ProductSnapshot],
    limit: usize,
) {
    let mut pool: Vec<&ProductSnapshot> = purchasable
        .iter()
        .filter(|p| p.id != target && !picked.contains(&p.id))
        .collect();
    pool.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    for same_category_pass in [true, false] {
        for product in &pool {
            if picked.len() >= limit {
                return;
            }
            let same_category = Some(product.category_id) == anchor_category;
            if same_category == same_category_pass && !picked.contains(&product.id) {
                picked.push(product.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, Utc};

    use crate::domain::catalog::ProductStatus;
    use crate::domain::order::{Order, OrderAction, OrderLine, PayType};
    use crate::infrastructure::memory::InMemoryStore;

    fn product_at(category_id: Uuid, minutes_ago: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: Uuid::new_v4(),
            title: "Oil-paper umbrella".to_string(),
            subtitle: None,
            category_id,
            price: BigDecimal::from(80),
            stock: 100,
            status: ProductStatus::OnSale,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn engine(store: &InMemoryStore) -> RecommendEngine<InMemoryStore, InMemoryStore> {
        RecommendEngine::new(store.clone(), store.clone())
    }

    /// Seed one paid single-line order per product for the given user.
    fn buy(store: &InMemoryStore, user: Uuid, products: &[&ProductSnapshot]) {
        for product in products {
            let now = Utc::now();
            let order = Order::pending(
                user,
                Uuid::new_v4(),
                None,
                product.price.clone(),
                now,
            );
            let line = OrderLine::snapshot(order.id, product, 1, now);
            store.create_pending(&order, &line).unwrap();
            store
                .transition(
                    order.id,
                    OrderAction::Pay {
                        caller: user,
                        pay_type: PayType::Other,
                    },
                )
                .unwrap();
        }
    }

    fn users(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn similarity_uses_global_purchaser_counts() {
        let target = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let u = users(4);
        let records: Vec<PurchaseRecord> = [
            (u[0], target),
            (u[0], a),
            (u[1], target),
            (u[1], a),
            (u[2], target),
            (u[2], b),
            (u[3], target),
        ]
        .into_iter()
        .map(|(user_id, product_id)| PurchaseRecord {
            user_id,
            product_id,
        })
        .collect();

        let scores = similarity_scores(target, &purchase_matrix(&records));

        // |U(target)| = 4, |U(a)| = 2, common = 2 -> 2 / (2 * sqrt(2))
        let expected_a = 2.0 / (4.0_f64.sqrt() * 2.0_f64.sqrt());
        // |U(b)| = 1, common = 1 -> 1 / (2 * 1)
        let expected_b = 1.0 / (4.0_f64.sqrt() * 1.0_f64.sqrt());
        assert!((scores[&a] - expected_a).abs() < 1e-12);
        assert!((scores[&b] - expected_b).abs() < 1e-12);
        assert!(scores[&a] > scores[&b]);
        assert!(!scores.contains_key(&target));
    }

    #[test]
    fn copurchased_product_with_stronger_overlap_wins() {
        let store = InMemoryStore::new();
        let category = Uuid::new_v4();
        let p = product_at(category, 30);
        let a = product_at(category, 20);
        let b = product_at(category, 10);
        for snapshot in [&p, &a, &b] {
            store.put_product((*snapshot).clone());
        }
        let u = users(4);
        buy(&store, u[0], &[&p, &a]);
        buy(&store, u[1], &[&p, &a]);
        buy(&store, u[2], &[&p, &b]);
        buy(&store, u[3], &[&p]);

        let top = engine(&store).recommend(p.id, 1).unwrap();
        assert_eq!(top, vec![a.id]);

        let both = engine(&store).recommend(p.id, 2).unwrap();
        assert_eq!(both, vec![a.id, b.id]);
    }

    #[test]
    fn equal_scores_break_ties_by_recency() {
        let store = InMemoryStore::new();
        let category = Uuid::new_v4();
        let p = product_at(category, 40);
        let older = product_at(category, 30);
        let newer = product_at(category, 5);
        for snapshot in [&p, &older, &newer] {
            store.put_product((*snapshot).clone());
        }
        // One buyer takes all three, so both candidates score identically.
        buy(&store, Uuid::new_v4(), &[&p, &older, &newer]);

        let ranked = engine(&store).recommend(p.id, 2).unwrap();
        assert_eq!(ranked, vec![newer.id, older.id]);
    }

    #[test]
    fn unpurchasable_candidates_are_dropped() {
        let store = InMemoryStore::new();
        let category = Uuid::new_v4();
        let p = product_at(category, 30);
        let mut a = product_at(category, 20);
        let b = product_at(category, 10);
        store.put_product(p.clone());
        store.put_product(a.clone());
        store.put_product(b.clone());
        let u = users(2);
        buy(&store, u[0], &[&p, &a]);
        buy(&store, u[1], &[&p, &b]);

        // Off-shelf after purchase history exists.
        a.status = ProductStatus::OffShelf;
        store.put_product(a.clone());

        let ranked = engine(&store).recommend(p.id, 2).unwrap();
        assert_eq!(ranked, vec![b.id]);
    }

    #[test]
    fn cold_start_falls_back_to_same_category_by_recency() {
        let store = InMemoryStore::new();
        let category = Uuid::new_v4();
        let other_category = Uuid::new_v4();
        let target = product_at(category, 60);
        let same_old = product_at(category, 40);
        let same_new = product_at(category, 10);
        let foreign = product_at(other_category, 1);
        for snapshot in [&target, &same_old, &same_new, &foreign] {
            store.put_product((*snapshot).clone());
        }

        let ranked = engine(&store).recommend(target.id, 3).unwrap();
        assert_eq!(ranked, vec![same_new.id, same_old.id, foreign.id]);
    }

    #[test]
    fn fallback_stops_at_catalog_exhaustion() {
        let store = InMemoryStore::new();
        let category = Uuid::new_v4();
        let target = product_at(category, 60);
        let only = product_at(category, 10);
        store.put_product(target.clone());
        store.put_product(only.clone());

        let ranked = engine(&store).recommend(target.id, 10).unwrap();
        assert_eq!(ranked, vec![only.id]);
    }

    #[test]
    fn unknown_target_still_pads_by_recency() {
        let store = InMemoryStore::new();
        let newest = product_at(Uuid::new_v4(), 1);
        let oldest = product_at(Uuid::new_v4(), 90);
        store.put_product(newest.clone());
        store.put_product(oldest.clone());

        let ranked = engine(&store).recommend(Uuid::new_v4(), 5).unwrap();
        assert_eq!(ranked, vec![newest.id, oldest.id]);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let store = InMemoryStore::new();
        assert!(engine(&store).recommend(Uuid::new_v4(), 0).unwrap().is_empty());
    }
}
