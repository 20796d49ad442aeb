//! Static catchment attribute categories.
//!
//! CAMELS-DE ships one attribute table per category. The order of
//! [`AttributeCategory::ALL`] is the order in which a station's attributes are
//! looked up, so the first missing category is always the same one.

use serde::Serialize;

use crate::table::Row;

/// One of the eight groups of per-station static attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCategory {
    Topographic,
    Soil,
    Landcover,
    Hydrogeology,
    HumanInfluence,
    Climatic,
    Hydrologic,
    SimulationBenchmark,
}

impl AttributeCategory {
    /// All categories in lookup order.
    pub const ALL: [AttributeCategory; 8] = [
        AttributeCategory::Topographic,
        AttributeCategory::Soil,
        AttributeCategory::Landcover,
        AttributeCategory::Hydrogeology,
        AttributeCategory::HumanInfluence,
        AttributeCategory::Climatic,
        AttributeCategory::Hydrologic,
        AttributeCategory::SimulationBenchmark,
    ];

    /// Field name used in the station response.
    pub fn key(&self) -> &'static str {
        match self {
            AttributeCategory::Topographic => "topographic",
            AttributeCategory::Soil => "soil",
            AttributeCategory::Landcover => "landcover",
            AttributeCategory::Hydrogeology => "hydrogeology",
            AttributeCategory::HumanInfluence => "humaninfluence",
            AttributeCategory::Climatic => "climatic",
            AttributeCategory::Hydrologic => "hydrologic",
            AttributeCategory::SimulationBenchmark => "simulation_benchmark",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            AttributeCategory::Topographic => "Topographic",
            AttributeCategory::Soil => "Soil",
            AttributeCategory::Landcover => "Landcover",
            AttributeCategory::Hydrogeology => "Hydrogeology",
            AttributeCategory::HumanInfluence => "Human influence",
            AttributeCategory::Climatic => "Climatic",
            AttributeCategory::Hydrologic => "Hydrologic",
            AttributeCategory::SimulationBenchmark => "Simulation benchmark",
        }
    }

    /// Name of the CSV file holding this category.
    ///
    /// The simulation benchmark table is the only one without the
    /// `_attributes` suffix.
    pub fn file_name(&self) -> String {
        match self {
            AttributeCategory::SimulationBenchmark => {
                "CAMELS_DE_simulation_benchmark.csv".to_string()
            }
            other => format!("CAMELS_DE_{}_attributes.csv", other.key()),
        }
    }
}

/// One attribute row per category for a single station.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CatchmentAttributes {
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub topographic: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub soil: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub landcover: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub hydrogeology: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub humaninfluence: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub climatic: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub hydrologic: Row,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub simulation_benchmark: Row,
}

impl CatchmentAttributes {
    /// The row of one category.
    pub fn get(&self, category: AttributeCategory) -> &Row {
        match category {
            AttributeCategory::Topographic => &self.topographic,
            AttributeCategory::Soil => &self.soil,
            AttributeCategory::Landcover => &self.landcover,
            AttributeCategory::Hydrogeology => &self.hydrogeology,
            AttributeCategory::HumanInfluence => &self.humaninfluence,
            AttributeCategory::Climatic => &self.climatic,
            AttributeCategory::Hydrologic => &self.hydrologic,
            AttributeCategory::SimulationBenchmark => &self.simulation_benchmark,
        }
    }

    /// Replace the row of one category.
    pub fn set(&mut self, category: AttributeCategory, row: Row) {
        let slot = match category {
            AttributeCategory::Topographic => &mut self.topographic,
            AttributeCategory::Soil => &mut self.soil,
            AttributeCategory::Landcover => &mut self.landcover,
            AttributeCategory::Hydrogeology => &mut self.hydrogeology,
            AttributeCategory::HumanInfluence => &mut self.humaninfluence,
            AttributeCategory::Climatic => &mut self.climatic,
            AttributeCategory::Hydrologic => &mut self.hydrologic,
            AttributeCategory::SimulationBenchmark => &mut self.simulation_benchmark,
        };
        *slot = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_names() {
        assert_eq!(
            AttributeCategory::Topographic.file_name(),
            "CAMELS_DE_topographic_attributes.csv"
        );
        assert_eq!(
            AttributeCategory::HumanInfluence.file_name(),
            "CAMELS_DE_humaninfluence_attributes.csv"
        );
        assert_eq!(
            AttributeCategory::SimulationBenchmark.file_name(),
            "CAMELS_DE_simulation_benchmark.csv"
        );
    }

    #[test]
    fn test_order_and_keys() {
        let keys: Vec<_> = AttributeCategory::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "topographic",
                "soil",
                "landcover",
                "hydrogeology",
                "humaninfluence",
                "climatic",
                "hydrologic",
                "simulation_benchmark",
            ]
        );
    }

    #[test]
    fn test_catchment_attributes_fields_match_keys() {
        let mut attributes = CatchmentAttributes::default();
        for (i, category) in AttributeCategory::ALL.iter().enumerate() {
            let mut row = Row::new();
            row.insert("index".to_string(), json!(i));
            attributes.set(*category, row);
        }

        let value = serde_json::to_value(&attributes).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 8);

        for (i, category) in AttributeCategory::ALL.iter().enumerate() {
            assert_eq!(object[category.key()]["index"], json!(i));
            assert_eq!(attributes.get(*category)["index"], json!(i));
        }
    }
}
