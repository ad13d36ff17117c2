//! Lifecycle engine: the order status state machine.
//!
//! Any status may transition to any other status; operators are trusted to
//! issue sensible transitions. A transition is first planned as a pure
//! value ([`TransitionPlan`]) and then applied - by the store as one
//! transaction, or in memory via [`apply_plan`].

use chrono::{DateTime, Utc};
use intake_models::{Order, OrderStatus, StatusHistory};

/// The fully computed outcome of one status transition.
///
/// Holds the final values for every field the transition touches, so a
/// store can write it without re-deriving any rule.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    /// Status immediately before the transition.
    pub old_status: OrderStatus,
    /// Status after the transition; unrecognized labels become
    /// [`OrderStatus::Custom`] and are stored verbatim.
    pub new_status: OrderStatus,
    /// Final expected delivery date (overwritten when the caller supplied
    /// one, kept otherwise).
    pub expected_delivery_date: Option<DateTime<Utc>>,
    /// Final actual delivery date. Set to `changed_at` exactly once, on the
    /// first transition into delivered; never reset afterwards.
    pub actual_delivery_date: Option<DateTime<Utc>>,
    /// When the transition happened; also becomes `updated_at`.
    pub changed_at: DateTime<Utc>,
    /// Note recorded on the history row.
    pub comment: Option<String>,
}

/// Plans a transition for `order` to the status named by `label`.
///
/// Pure: nothing is mutated. The caller hands the plan to the store (or to
/// [`apply_plan`]) to make it real.
pub fn plan_transition(
    order: &Order,
    label: &str,
    expected_delivery_date: Option<DateTime<Utc>>,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> TransitionPlan {
    let new_status = OrderStatus::from_label(label);

    let actual_delivery_date = if new_status.is_delivered() && order.actual_delivery_date.is_none()
    {
        Some(now)
    } else {
        order.actual_delivery_date
    };

    TransitionPlan {
        old_status: order.status.clone(),
        new_status,
        expected_delivery_date: expected_delivery_date.or(order.expected_delivery_date),
        actual_delivery_date,
        changed_at: now,
        comment,
    }
}

/// Applies a plan to an in-memory order: status, dates, `updated_at`, and
/// the appended history row.
pub fn apply_plan(order: &mut Order, plan: &TransitionPlan) {
    order.status = plan.new_status.clone();
    order.expected_delivery_date = plan.expected_delivery_date;
    order.actual_delivery_date = plan.actual_delivery_date;
    order.touch(plan.changed_at);
    order.history.push(StatusHistory {
        old_status: Some(plan.old_status.clone()),
        new_status: plan.new_status.clone(),
        changed_at: plan.changed_at,
        comment: plan.comment.clone(),
    });
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        Order {
            id: 1,
            created_at: now,
            updated_at: now,
            status: status.clone(),
            delivery_address: None,
            contact_email: None,
            contact_phone: None,
            total_amount: Decimal::ZERO,
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: String::new(),
            items: Vec::new(),
            history: vec![StatusHistory {
                old_status: None,
                new_status: status,
                changed_at: now,
                comment: None,
            }],
        }
    }

    #[test]
    fn test_delivered_sets_actual_date_once() {
        let mut order = order(OrderStatus::Shipped);
        let first = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
        let second = first + Duration::days(1);

        let plan = plan_transition(&order, "delivered", None, None, first);
        apply_plan(&mut order, &plan);
        assert_eq!(order.actual_delivery_date, Some(first));

        // Re-delivering must not move the actual date.
        let plan = plan_transition(&order, "delivered", None, None, second);
        apply_plan(&mut order, &plan);
        assert_eq!(order.actual_delivery_date, Some(first));
        assert_eq!(order.updated_at, second);
    }

    #[test]
    fn test_custom_label_stored_verbatim_and_does_not_deliver() {
        let mut order = order(OrderStatus::Pending);
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();

        let plan = plan_transition(&order, "deliverd", None, None, now);
        apply_plan(&mut order, &plan);

        assert_eq!(order.status, OrderStatus::Custom("deliverd".to_string()));
        assert!(order.actual_delivery_date.is_none());
    }

    #[test]
    fn test_expected_date_overwritten_only_when_supplied() {
        let mut order = order(OrderStatus::Pending);
        let first_eta = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let second_eta = Utc.with_ymd_and_hms(2025, 1, 25, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();

        let plan = plan_transition(&order, "confirmed", Some(first_eta), None, now);
        apply_plan(&mut order, &plan);
        assert_eq!(order.expected_delivery_date, Some(first_eta));

        // No date supplied: keep the current one.
        let plan = plan_transition(&order, "shipped", None, None, now);
        apply_plan(&mut order, &plan);
        assert_eq!(order.expected_delivery_date, Some(first_eta));

        // Date supplied: overwrite unconditionally.
        let plan = plan_transition(&order, "shipped", Some(second_eta), None, now);
        apply_plan(&mut order, &plan);
        assert_eq!(order.expected_delivery_date, Some(second_eta));
    }

    #[test]
    fn test_no_terminal_state() {
        let mut order = order(OrderStatus::Delivered);
        order.actual_delivery_date = Some(order.created_at);
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();

        let plan = plan_transition(&order, "pending", None, None, now);
        apply_plan(&mut order, &plan);

        assert_eq!(order.status, OrderStatus::Pending);
        // Leaving delivered does not clear the recorded delivery.
        assert!(order.actual_delivery_date.is_some());
    }

    #[test]
    fn test_history_replays_status_timeline() {
        let mut order = order(OrderStatus::Pending);
        let base = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();

        for (i, label) in ["confirmed", "shipped", "delivered"].iter().enumerate() {
            let now = base + Duration::hours(i as i64);
            let plan = plan_transition(&order, label, None, Some("ok".to_string()), now);
            apply_plan(&mut order, &plan);
        }

        // 1 creation record + 3 transitions.
        assert_eq!(order.history.len(), 4);
        assert!(order.history[0].old_status.is_none());

        // Each entry's old status chains to the previous entry's new status.
        for pair in order.history.windows(2) {
            assert_eq!(pair[1].old_status.as_ref(), Some(&pair[0].new_status));
            assert!(pair[0].changed_at <= pair[1].changed_at);
        }
        assert_eq!(order.history.last().unwrap().new_status, order.status);
    }
}
