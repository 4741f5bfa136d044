//! Static risk category reference catalog

use serde::Serialize;

/// Named risk dimension. Reference data only; never stored per country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub data_sources: &'static [&'static str],
}

pub static RISK_CATEGORIES: [RiskCategory; 8] = [
    RiskCategory {
        id: "money_laundering",
        name: "Money Laundering",
        description: "Risk of money laundering activities",
        data_sources: &["FATF", "Basel AML Index"],
    },
    RiskCategory {
        id: "terrorism_financing",
        name: "Terrorism Financing",
        description: "Risk of terrorism financing activities",
        data_sources: &["FATF", "UN Security Council"],
    },
    RiskCategory {
        id: "sanctions",
        name: "Sanctions and Evasion",
        description: "International sanctions and evasion risks",
        data_sources: &["OFAC", "UN", "EU Sanctions"],
    },
    RiskCategory {
        id: "transparency",
        name: "Transparency",
        description: "Government and financial transparency",
        data_sources: &["Transparency International", "World Bank"],
    },
    RiskCategory {
        id: "corruption",
        name: "Corruption",
        description: "Corruption perception and risks",
        data_sources: &["Corruption Perceptions Index"],
    },
    RiskCategory {
        id: "regulatory_compliance",
        name: "Regulatory Compliance",
        description: "Adherence to international regulatory standards",
        data_sources: &["World Bank", "IMF"],
    },
    RiskCategory {
        id: "political_stability",
        name: "Political Stability",
        description: "Political stability and governance",
        data_sources: &["World Bank Governance Indicators"],
    },
    RiskCategory {
        id: "economic_risk",
        name: "Economic Risk",
        description: "Economic stability and financial risks",
        data_sources: &["IMF", "World Bank", "Credit Rating Agencies"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_ids_unique() {
        let ids: HashSet<_> = RISK_CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), RISK_CATEGORIES.len());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(RISK_CATEGORIES[0]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "money_laundering",
                "name": "Money Laundering",
                "description": "Risk of money laundering activities",
                "data_sources": ["FATF", "Basel AML Index"]
            })
        );
    }
}
