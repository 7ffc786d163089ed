use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutrientCategory {
    Agua,
    Azucar,
    Carbohidratos,
    Proteina,
    Fruta,
    Grasa,
    Vegetales,
}

impl NutrientCategory {
    pub const ALL: [NutrientCategory; 7] = [
        NutrientCategory::Agua,
        NutrientCategory::Azucar,
        NutrientCategory::Carbohidratos,
        NutrientCategory::Proteina,
        NutrientCategory::Fruta,
        NutrientCategory::Grasa,
        NutrientCategory::Vegetales,
    ];

    /// Storage key, also the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            NutrientCategory::Agua => "Agua",
            NutrientCategory::Azucar => "Azucar",
            NutrientCategory::Carbohidratos => "Carbohidratos",
            NutrientCategory::Proteina => "Proteina",
            NutrientCategory::Fruta => "Fruta",
            NutrientCategory::Grasa => "Grasa",
            NutrientCategory::Vegetales => "Vegetales",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NutrientCategory::Azucar => "Azúcar",
            NutrientCategory::Proteina => "Proteína",
            other => other.label(),
        }
    }

    pub fn default_max(self) -> u32 {
        match self {
            NutrientCategory::Agua => 8,
            NutrientCategory::Azucar => 2,
            NutrientCategory::Carbohidratos => 5,
            NutrientCategory::Proteina => 4,
            NutrientCategory::Fruta => 3,
            NutrientCategory::Grasa => 2,
            NutrientCategory::Vegetales => 5,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Lunes,
    Martes,
    #[serde(rename = "Miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(rename = "Sábado")]
    Sabado,
    Domingo,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Lunes,
        Day::Martes,
        Day::Miercoles,
        Day::Jueves,
        Day::Viernes,
        Day::Sabado,
        Day::Domingo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Lunes => "Lunes",
            Day::Martes => "Martes",
            Day::Miercoles => "Miércoles",
            Day::Jueves => "Jueves",
            Day::Viernes => "Viernes",
            Day::Sabado => "Sábado",
            Day::Domingo => "Domingo",
        }
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Portion counts for one category, one slot per [`Day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Day, u32>", into = "BTreeMap<Day, u32>")]
pub struct WeekPortions([u32; 7]);

impl WeekPortions {
    pub fn get(&self, day: Day) -> u32 {
        self.0[day.index()]
    }

    pub fn set(&mut self, day: Day, count: u32) {
        self.0[day.index()] = count;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, u32)> + '_ {
        Day::ALL.into_iter().map(move |day| (day, self.get(day)))
    }
}

// Days missing from persisted data read as zero.
impl From<BTreeMap<Day, u32>> for WeekPortions {
    fn from(map: BTreeMap<Day, u32>) -> Self {
        Self(Day::ALL.map(|day| map.get(&day).copied().unwrap_or_default()))
    }
}

impl From<WeekPortions> for BTreeMap<Day, u32> {
    fn from(portions: WeekPortions) -> Self {
        portions.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientData {
    pub max_portions: u32,
    #[serde(default)]
    pub portions: WeekPortions,
}

impl NutrientData {
    pub fn new(max_portions: u32) -> Self {
        Self {
            max_portions,
            portions: WeekPortions::default(),
        }
    }
}

/// Counts and maxima for every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<NutrientCategory, NutrientData>",
    into = "BTreeMap<NutrientCategory, NutrientData>"
)]
pub struct TrackerState([NutrientData; 7]);

impl TrackerState {
    pub fn get(&self, category: NutrientCategory) -> &NutrientData {
        &self.0[category.index()]
    }

    pub fn get_mut(&mut self, category: NutrientCategory) -> &mut NutrientData {
        &mut self.0[category.index()]
    }

    pub fn portions(&self, category: NutrientCategory, day: Day) -> u32 {
        self.get(category).portions.get(day)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientCategory, &NutrientData)> + '_ {
        NutrientCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Cells whose portion count differs between `self` and `other`.
    pub fn changed_cells(&self, other: &TrackerState) -> Vec<CellRef> {
        let mut cells = Vec::new();
        for category in NutrientCategory::ALL {
            for day in Day::ALL {
                if self.portions(category, day) != other.portions(category, day) {
                    cells.push(CellRef { category, day });
                }
            }
        }
        cells
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self(NutrientCategory::ALL.map(|category| NutrientData::new(category.default_max())))
    }
}

impl From<BTreeMap<NutrientCategory, NutrientData>> for TrackerState {
    fn from(mut map: BTreeMap<NutrientCategory, NutrientData>) -> Self {
        Self(NutrientCategory::ALL.map(|category| {
            map.remove(&category)
                .unwrap_or_else(|| NutrientData::new(category.default_max()))
        }))
    }
}

impl From<TrackerState> for BTreeMap<NutrientCategory, NutrientData> {
    fn from(state: TrackerState) -> Self {
        state.iter().map(|(category, data)| (category, *data)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("expected {expected} categories in order, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("category {0:?} appears more than once in order")]
    Duplicate(NutrientCategory),
}

/// Row display order; always a permutation of [`NutrientCategory::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NutrientCategory>", into = "Vec<NutrientCategory>")]
pub struct NutrientOrder(Vec<NutrientCategory>);

impl NutrientOrder {
    pub fn as_slice(&self) -> &[NutrientCategory] {
        &self.0
    }

    /// Splice-style move. Returns false and leaves the order alone when
    /// either index is out of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.0.len() || to >= self.0.len() {
            return false;
        }
        let category = self.0.remove(from);
        self.0.insert(to, category);
        true
    }
}

impl Default for NutrientOrder {
    fn default() -> Self {
        Self(NutrientCategory::ALL.to_vec())
    }
}

impl TryFrom<Vec<NutrientCategory>> for NutrientOrder {
    type Error = OrderError;

    fn try_from(categories: Vec<NutrientCategory>) -> Result<Self, Self::Error> {
        if categories.len() != NutrientCategory::ALL.len() {
            return Err(OrderError::WrongLength {
                expected: NutrientCategory::ALL.len(),
                found: categories.len(),
            });
        }
        let mut seen = [false; 7];
        for category in &categories {
            if std::mem::replace(&mut seen[category.index()], true) {
                return Err(OrderError::Duplicate(*category));
            }
        }
        Ok(Self(categories))
    }
}

impl From<NutrientOrder> for Vec<NutrientCategory> {
    fn from(order: NutrientOrder) -> Self {
        order.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    pub category: NutrientCategory,
    pub day: Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TrackerAction {
    SetMaxPortions {
        category: NutrientCategory,
        value: i64,
    },
    SetPortions {
        category: NutrientCategory,
        day: Day,
        count: i64,
    },
    StepPortions {
        category: NutrientCategory,
        day: Day,
        delta: i64,
    },
    Reset,
    Reorder {
        #[serde(default)]
        from: Option<usize>,
        #[serde(default)]
        to: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub ready: bool,
    pub data: TrackerState,
    pub order: NutrientOrder,
    pub highlighted: Vec<CellRef>,
}

#[derive(Debug, Deserialize)]
pub struct StepForm {
    pub category: NutrientCategory,
    pub day: Day,
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct MaxForm {
    pub category: NutrientCategory,
    pub value: String,
}

/// Drag endpoints from a plain form post. Blank or unparseable fields mean
/// the drag never registered that end.
#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl ReorderForm {
    pub fn from_index(&self) -> Option<usize> {
        self.from.trim().parse().ok()
    }

    pub fn to_index(&self) -> Option<usize> {
        self.to.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_uses_configured_maxima_and_zero_portions() {
        let state = TrackerState::default();
        for (category, data) in state.iter() {
            assert_eq!(data.max_portions, category.default_max());
            assert!(data.portions.iter().all(|(_, count)| count == 0));
        }
        assert_eq!(state.get(NutrientCategory::Agua).max_portions, 8);
        assert_eq!(state.get(NutrientCategory::Grasa).max_portions, 2);
    }

    #[test]
    fn state_serializes_with_fixed_labels() {
        let mut state = TrackerState::default();
        state
            .get_mut(NutrientCategory::Azucar)
            .portions
            .set(Day::Miercoles, 3);

        let value = serde_json::to_value(&state).unwrap();
        let azucar = &value["Azucar"];
        assert_eq!(azucar["maxPortions"], 2);
        assert_eq!(azucar["portions"]["Miércoles"], 3);
        assert_eq!(azucar["portions"]["Sábado"], 0);
        assert_eq!(value.as_object().unwrap().len(), 7);
        assert_eq!(azucar["portions"].as_object().unwrap().len(), 7);
    }

    #[test]
    fn state_survives_repeated_save_and_load() {
        let mut state = TrackerState::default();
        state.get_mut(NutrientCategory::Fruta).max_portions = 6;
        state.get_mut(NutrientCategory::Fruta).portions.set(Day::Domingo, 2);

        let first = serde_json::to_string(&state).unwrap();
        let loaded: TrackerState = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&loaded).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_entries_fall_back_to_defaults() {
        let raw = r#"{ "Agua": { "maxPortions": 10, "portions": { "Lunes": 4 } } }"#;
        let state: TrackerState = serde_json::from_str(raw).unwrap();

        assert_eq!(state.get(NutrientCategory::Agua).max_portions, 10);
        assert_eq!(state.portions(NutrientCategory::Agua, Day::Lunes), 4);
        assert_eq!(state.portions(NutrientCategory::Agua, Day::Martes), 0);
        assert_eq!(
            state.get(NutrientCategory::Vegetales),
            &NutrientData::new(5)
        );
    }

    #[test]
    fn negative_counts_do_not_parse() {
        let raw = r#"{ "Agua": { "maxPortions": -1, "portions": {} } }"#;
        assert!(serde_json::from_str::<TrackerState>(raw).is_err());
    }

    #[test]
    fn unknown_category_does_not_parse() {
        let raw = r#"{ "Cafe": { "maxPortions": 1, "portions": {} } }"#;
        assert!(serde_json::from_str::<TrackerState>(raw).is_err());
    }

    #[test]
    fn order_rejects_non_permutations() {
        let short = vec![NutrientCategory::Agua];
        assert_eq!(
            NutrientOrder::try_from(short),
            Err(OrderError::WrongLength {
                expected: 7,
                found: 1
            })
        );

        let mut doubled = NutrientCategory::ALL.to_vec();
        doubled[6] = NutrientCategory::Agua;
        assert_eq!(
            NutrientOrder::try_from(doubled),
            Err(OrderError::Duplicate(NutrientCategory::Agua))
        );

        let raw = r#"["Agua","Agua","Carbohidratos","Proteina","Fruta","Grasa","Vegetales"]"#;
        assert!(serde_json::from_str::<NutrientOrder>(raw).is_err());
    }

    #[test]
    fn order_serializes_as_label_array() {
        let order = NutrientOrder::default();
        let raw = serde_json::to_string(&order).unwrap();
        assert_eq!(
            raw,
            r#"["Agua","Azucar","Carbohidratos","Proteina","Fruta","Grasa","Vegetales"]"#
        );
    }

    #[test]
    fn move_entry_matches_splice_semantics() {
        let mut order = NutrientOrder::default();
        assert!(order.move_entry(0, 2));
        assert_eq!(
            &order.as_slice()[..4],
            &[
                NutrientCategory::Azucar,
                NutrientCategory::Carbohidratos,
                NutrientCategory::Agua,
                NutrientCategory::Proteina,
            ]
        );

        assert!(!order.move_entry(7, 0));
        assert!(!order.move_entry(0, 7));
        assert_eq!(order.as_slice().len(), 7);
    }

    #[test]
    fn actions_use_tagged_json() {
        let action: TrackerAction = serde_json::from_str(
            r#"{ "action": "setPortions", "category": "Proteina", "day": "Sábado", "count": 2 }"#,
        )
        .unwrap();
        assert_eq!(
            action,
            TrackerAction::SetPortions {
                category: NutrientCategory::Proteina,
                day: Day::Sabado,
                count: 2,
            }
        );

        let reorder: TrackerAction =
            serde_json::from_str(r#"{ "action": "reorder", "from": 1 }"#).unwrap();
        assert_eq!(
            reorder,
            TrackerAction::Reorder {
                from: Some(1),
                to: None
            }
        );
    }

    #[test]
    fn changed_cells_ignores_maxima() {
        let before = TrackerState::default();
        let mut after = before.clone();
        after.get_mut(NutrientCategory::Agua).max_portions = 1;
        after.get_mut(NutrientCategory::Grasa).portions.set(Day::Viernes, 2);
        after.get_mut(NutrientCategory::Agua).portions.set(Day::Lunes, 1);

        assert_eq!(
            before.changed_cells(&after),
            vec![
                CellRef {
                    category: NutrientCategory::Agua,
                    day: Day::Lunes
                },
                CellRef {
                    category: NutrientCategory::Grasa,
                    day: Day::Viernes
                },
            ]
        );
        assert!(after.changed_cells(&after).is_empty());
    }

    #[test]
    fn reorder_form_treats_blank_as_missing() {
        let form = ReorderForm {
            from: String::new(),
            to: " 2 ".to_string(),
        };
        assert_eq!(form.from_index(), None);
        assert_eq!(form.to_index(), Some(2));
    }

    #[test]
    fn weekday_maps_monday_first() {
        assert_eq!(Day::from_weekday(chrono::Weekday::Mon), Day::Lunes);
        assert_eq!(Day::from_weekday(chrono::Weekday::Sun), Day::Domingo);
    }
}
