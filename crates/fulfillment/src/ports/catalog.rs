use crate::model::{Amount, Dish, DishId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Dish lookup, consulted only while pricing a new order.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_dish(&self, dish_id: &DishId) -> Option<Dish>;
}

/// In-memory catalog. Prices can be edited while the system runs.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    dishes: RwLock<HashMap<DishId, Dish>>,
}

impl StaticCatalog {
    pub fn new(dishes: impl IntoIterator<Item = Dish>) -> Self {
        let dishes = dishes.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            dishes: RwLock::new(dishes),
        }
    }

    pub fn insert(&self, dish: Dish) {
        self.dishes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dish.id.clone(), dish);
    }

    pub fn set_price(&self, dish_id: &DishId, price: Amount) {
        if let Some(dish) = self
            .dishes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(dish_id)
        {
            dish.price = price;
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn get_dish(&self, dish_id: &DishId) -> Option<Dish> {
        self.dishes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dish_id)
            .cloned()
    }
}
