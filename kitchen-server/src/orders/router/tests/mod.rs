use super::*;
use parking_lot::Mutex;
use shared::models::{Category, Product, ReadyCheck, ScreenCreate};

mod test_diagnostics;

const GRILL: i64 = 10;
const BAR: i64 = 20;
const DESSERT: i64 = 30;

const BURGER: i64 = 1;
const BEER: i64 = 2;
const CAKE: i64 = 3;
const WATER: i64 = 4;

/// Collects every notification instead of publishing it
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, OrderNotification)>>,
}

impl RecordingNotifier {
    fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

impl OrderNotifier for RecordingNotifier {
    fn notify(&self, topic: &str, payload: &OrderNotification) {
        self.sent.lock().push((topic.to_string(), payload.clone()));
    }
}

struct Harness {
    router: OrderRouter,
    screens: ScreenRegistry,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Screen on `register_id` with the given allow-list
    fn with_screen(&self, register_id: i64, category_ids: Vec<i64>) {
        self.screens
            .register(ScreenCreate {
                register_id,
                category_ids,
                sequence: None,
            })
            .unwrap();
    }

    fn order(&self, reference: &str) -> KitchenOrder {
        self.router.find_order(reference).unwrap().unwrap()
    }

    fn lines(&self, reference: &str) -> Vec<KitchenOrderLine> {
        let order = self.order(reference);
        self.router.order_lines(order.id).unwrap()
    }
}

fn harness() -> Harness {
    let storage = KitchenStorage::open_in_memory().unwrap();
    let screens = ScreenRegistry::new(storage.clone());
    let catalog = CatalogService::in_memory();

    catalog
        .replace_categories(vec![
            Category { id: GRILL, name: "Grill".to_string() },
            Category { id: BAR, name: "Bar".to_string() },
            Category { id: DESSERT, name: "Dessert".to_string() },
        ])
        .unwrap();
    catalog
        .replace_products(vec![
            Product { id: BURGER, name: "Burger".to_string(), category_ids: vec![GRILL] },
            Product { id: BEER, name: "Beer".to_string(), category_ids: vec![BAR] },
            Product { id: CAKE, name: "Cake".to_string(), category_ids: vec![DESSERT, BAR] },
            Product { id: WATER, name: "Water".to_string(), category_ids: vec![] },
        ])
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let router = OrderRouter::new(storage, screens.clone(), catalog, notifier.clone());

    Harness {
        router,
        screens,
        notifier,
    }
}

fn line(product_id: i64) -> LineSnapshot {
    LineSnapshot {
        product_id: Some(product_id),
        qty: 1.0,
        name: None,
        note: None,
    }
}

fn snapshot(reference: &str, products: &[i64]) -> OrderSnapshot {
    OrderSnapshot {
        reference: reference.to_string(),
        floor: Some("Main".to_string()),
        hour: Some("12".to_string()),
        minutes: Some("05".to_string()),
        lines: products.iter().map(|p| line(*p)).collect(),
        ..Default::default()
    }
}

/// Snapshot for the standalone creation path
fn register_snapshot(reference: &str, register_id: i64, products: &[i64]) -> OrderSnapshot {
    OrderSnapshot {
        register_id: Some(register_id),
        ..snapshot(reference, products)
    }
}

fn references(details: &KitchenDetails) -> Vec<String> {
    details.orders.iter().map(|o| o.reference.clone()).collect()
}

fn line_products(details: &KitchenDetails) -> Vec<i64> {
    details.lines.iter().map(|l| l.product_id).collect()
}
