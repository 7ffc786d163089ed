use crate::models::{Day, NutrientCategory, NutrientOrder, TrackerAction, TrackerState};

/// Owns the portion matrix and the row order. Every mutation goes through
/// the methods below; each returns whether it was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracker {
    state: TrackerState,
    order: NutrientOrder,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(state: TrackerState, order: NutrientOrder) -> Self {
        Self { state, order }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn order(&self) -> &NutrientOrder {
        &self.order
    }

    /// Negative or oversized values are ignored. Existing counts are not
    /// clamped to the new maximum.
    pub fn set_max_portions(&mut self, category: NutrientCategory, new_max: i64) -> bool {
        let Ok(new_max) = u32::try_from(new_max) else {
            return false;
        };
        self.state.get_mut(category).max_portions = new_max;
        true
    }

    pub fn set_portions(&mut self, category: NutrientCategory, day: Day, new_count: i64) -> bool {
        let Ok(new_count) = u32::try_from(new_count) else {
            return false;
        };
        self.state.get_mut(category).portions.set(day, new_count);
        true
    }

    pub fn reset(&mut self) {
        for category in NutrientCategory::ALL {
            let data = self.state.get_mut(category);
            for day in Day::ALL {
                data.portions.set(day, 0);
            }
        }
    }

    pub fn reorder(&mut self, from: Option<usize>, to: Option<usize>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => self.order.move_entry(from, to),
            _ => false,
        }
    }

    pub fn apply(&mut self, action: &TrackerAction) -> bool {
        match *action {
            TrackerAction::SetMaxPortions { category, value } => {
                self.set_max_portions(category, value)
            }
            TrackerAction::SetPortions {
                category,
                day,
                count,
            } => self.set_portions(category, day, count),
            TrackerAction::StepPortions {
                category,
                day,
                delta,
            } => {
                let current = i64::from(self.state.portions(category, day));
                self.set_portions(category, day, current.saturating_add(delta))
            }
            TrackerAction::Reset => {
                self.reset();
                true
            }
            TrackerAction::Reorder { from, to } => self.reorder(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NutrientCategory::*;

    #[test]
    fn set_portions_touches_only_one_cell() {
        let mut tracker = Tracker::new();
        let before = tracker.state().clone();

        assert!(tracker.set_portions(Proteina, Day::Jueves, 3));

        for category in NutrientCategory::ALL {
            for day in Day::ALL {
                let expected = if (category, day) == (Proteina, Day::Jueves) {
                    3
                } else {
                    before.portions(category, day)
                };
                assert_eq!(tracker.state().portions(category, day), expected);
            }
        }
    }

    #[test]
    fn set_portions_has_no_upper_bound() {
        let mut tracker = Tracker::new();
        assert!(tracker.set_portions(Azucar, Day::Lunes, 40));
        assert_eq!(tracker.state().portions(Azucar, Day::Lunes), 40);
        assert_eq!(tracker.state().get(Azucar).max_portions, 2);
    }

    #[test]
    fn negative_portions_are_ignored() {
        let mut tracker = Tracker::new();
        tracker.set_portions(Agua, Day::Martes, 2);
        assert!(!tracker.set_portions(Agua, Day::Martes, -1));
        assert_eq!(tracker.state().portions(Agua, Day::Martes), 2);
    }

    #[test]
    fn negative_max_is_ignored() {
        let mut tracker = Tracker::new();
        assert!(!tracker.set_max_portions(Fruta, -1));
        assert!(!tracker.set_max_portions(Fruta, i64::MIN));
        assert_eq!(tracker.state().get(Fruta).max_portions, 3);

        assert!(tracker.set_max_portions(Fruta, 0));
        assert_eq!(tracker.state().get(Fruta).max_portions, 0);
    }

    #[test]
    fn lowering_max_keeps_counts() {
        let mut tracker = Tracker::new();
        tracker.set_portions(Grasa, Day::Viernes, 4);
        tracker.set_max_portions(Grasa, 1);
        assert_eq!(tracker.state().portions(Grasa, Day::Viernes), 4);
    }

    #[test]
    fn reset_zeroes_counts_only() {
        let mut tracker = Tracker::new();
        tracker.set_max_portions(Vegetales, 9);
        tracker.set_portions(Vegetales, Day::Domingo, 7);
        tracker.set_portions(Agua, Day::Lunes, 1);
        tracker.reorder(Some(6), Some(0));
        let order = tracker.order().clone();

        tracker.reset();

        for (_, data) in tracker.state().iter() {
            assert!(data.portions.iter().all(|(_, count)| count == 0));
        }
        assert_eq!(tracker.state().get(Vegetales).max_portions, 9);
        assert_eq!(tracker.order(), &order);
    }

    #[test]
    fn reorder_moves_one_entry() {
        let mut tracker = Tracker::new();
        assert!(tracker.reorder(Some(0), Some(2)));
        assert_eq!(
            tracker.order().as_slice(),
            &[Azucar, Carbohidratos, Agua, Proteina, Fruta, Grasa, Vegetales]
        );

        assert!(tracker.reorder(Some(6), Some(1)));
        assert_eq!(
            tracker.order().as_slice(),
            &[Azucar, Vegetales, Carbohidratos, Agua, Proteina, Fruta, Grasa]
        );
    }

    #[test]
    fn reorder_without_both_ends_is_a_no_op() {
        let mut tracker = Tracker::new();
        assert!(!tracker.reorder(None, Some(2)));
        assert!(!tracker.reorder(Some(1), None));
        assert!(!tracker.reorder(None, None));
        assert_eq!(tracker.order(), &NutrientOrder::default());
    }

    #[test]
    fn step_goes_through_set_portions() {
        let mut tracker = Tracker::new();
        let down = TrackerAction::StepPortions {
            category: Carbohidratos,
            day: Day::Sabado,
            delta: -1,
        };
        let up = TrackerAction::StepPortions {
            category: Carbohidratos,
            day: Day::Sabado,
            delta: 1,
        };

        assert!(!tracker.apply(&down));
        assert!(tracker.apply(&up));
        assert!(tracker.apply(&up));
        assert!(tracker.apply(&down));
        assert_eq!(tracker.state().portions(Carbohidratos, Day::Sabado), 1);
    }
}
