use super::*;

#[test]
fn test_unknown_order() {
    let h = harness();

    assert_eq!(
        h.router.check_ready_detailed("nope").unwrap(),
        ReadyCheck::Pending(false)
    );
    assert!(h.router.check_pending("nope").unwrap());
}

#[test]
fn test_register_without_screen() {
    let h = harness();
    h.router.ingest(1, &[snapshot("R1", &[BURGER])]);

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::Pending(false)
    );
    assert!(h.router.check_pending("R1").unwrap());
}

#[test]
fn test_pending_until_ready() {
    let h = harness();
    h.with_screen(1, vec![GRILL]);
    h.router.ingest(1, &[snapshot("R1", &[BURGER, WATER])]);

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::Pending(true)
    );
    assert!(h.router.check_pending("R1").unwrap());

    h.router.progress_to_ready("R1").unwrap();

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::Pending(false)
    );
    assert!(!h.router.check_pending("R1").unwrap());
}

#[test]
fn test_category_mismatch_takes_precedence_over_status() {
    let h = harness();
    h.with_screen(1, vec![GRILL]);
    h.router.ingest(1, &[snapshot("R1", &[BURGER, BEER])]);
    h.router.progress_to_ready("R1").unwrap();

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::MissingCategory {
            category: "Bar".to_string()
        }
    );
    assert!(h.router.check_pending("R1").unwrap());
}

#[test]
fn test_first_offender_by_line_then_category_id() {
    let h = harness();
    h.with_screen(1, vec![GRILL]);
    // Cake is in Dessert(30) and Bar(20); Beer only in Bar
    h.router.ingest(1, &[snapshot("R1", &[BURGER, CAKE, BEER])]);

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::MissingCategory {
            category: "Bar".to_string()
        }
    );
}

#[test]
fn test_unrestricted_screen_never_reports_category() {
    let h = harness();
    h.with_screen(1, vec![]);
    h.router.ingest(1, &[snapshot("R1", &[BURGER, BEER, CAKE])]);

    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::Pending(true)
    );
}

#[test]
fn test_partially_allowed_product_is_still_reported() {
    let h = harness();
    h.with_screen(1, vec![BAR]);
    // Cake shows on the screen through Bar but Dessert is not configured
    h.router.ingest(1, &[snapshot("R1", &[CAKE])]);

    assert_eq!(line_products(&h.router.get_details(1)), vec![CAKE]);
    assert_eq!(
        h.router.check_ready_detailed("R1").unwrap(),
        ReadyCheck::MissingCategory {
            category: "Dessert".to_string()
        }
    );
}
