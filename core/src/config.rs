use crate::{
    coefficients::{
        CoefficientKind, EfficiencyRule, OperationClass, SpeedNorms, EFFICIENCY, SERVICE,
        SPEED_DELIVERY, SPEED_RECEPTION,
    },
    error::{CalcError, CalcResult},
    ladder::ThresholdLadder,
    pvz::PvzTables,
    types::{CoefficientId, KpiId, Money, OperationId, PositionId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tolerance for KPI weight sums.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

// ── Operation catalog ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    /// `value` per unit.
    Fixed,
    /// `value` is a fraction of a monetary quantity.
    Percent,
    /// Priced by a dedicated rule (the PVZ tables).
    Formula,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationConfig {
    pub id:              OperationId,
    pub name:            String,
    pub rate_label:      String,
    pub amount_type:     AmountType,
    pub value:           f64,
    pub unit:            String,
    pub operation_class: OperationClass,
    #[serde(default)]
    pub emoji:           String,
    /// Per-unit quantity above which input is probably a typo.
    /// Ignored for percent and formula operations.
    #[serde(default)]
    pub max_reasonable:  Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct OperationCatalogFile {
    operations: Vec<OperationConfig>,
}

// ── KPI catalog ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiConfig {
    pub id:          KpiId,
    pub name:        String,
    /// Key into `RulesConfig::kpi_ladders`.
    pub ladder:      String,
    #[serde(default)]
    pub emoji:       String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct KpiCatalogFile {
    kpis: Vec<KpiConfig>,
}

// ── Team coefficient catalog ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCoefficientConfig {
    pub id:          CoefficientId,
    pub name:        String,
    pub kind:        CoefficientKind,
    #[serde(default)]
    pub emoji:       String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamCoefficientFile {
    team_coefficients: Vec<TeamCoefficientConfig>,
}

// ── Positions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionConfig {
    pub id:                PositionId,
    pub name:              String,
    #[serde(default)]
    pub emoji:             String,
    pub operations:        Vec<OperationId>,
    /// Empty for positions without a KPI component.
    #[serde(default)]
    pub kpi:               Vec<KpiId>,
    #[serde(default)]
    pub team_coefficients: Vec<CoefficientId>,
    /// KPI id -> share of the KPI pool. Must sum to 1.0 when present.
    #[serde(default)]
    pub kpi_weights:       Option<HashMap<KpiId, f64>>,
    /// Position may claim a flat bonus for managing subordinates.
    #[serde(default)]
    pub has_team_bonus:    bool,
}

impl PositionConfig {
    pub fn has_kpi(&self) -> bool {
        !self.kpi.is_empty()
    }

    pub fn weight_sum(&self) -> Option<f64> {
        self.kpi_weights.as_ref().map(|w| w.values().sum())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PositionsFile {
    positions: Vec<PositionConfig>,
}

// ── Rules ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPoolRule {
    /// Share of real salary that forms the KPI pool.
    pub pool_share:      f64,
    /// Salary used when base salary or position rate is not given.
    pub fallback_salary: Money,
    /// KPI that gates the whole KPI bonus.
    pub gate_kpi:        KpiId,
    /// Gate KPI percent below which no KPI bonus is paid.
    pub gate_percent:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub service_ladder: ThresholdLadder,
    pub kpi_ladders:    HashMap<String, ThresholdLadder>,
    pub kpi_pool:       KpiPoolRule,
    pub efficiency:     EfficiencyRule,
    pub speed:          SpeedNorms,
    pub pvz:            PvzTables,
    /// Allowed position rates (fractions of a full-time position).
    pub position_rates: Vec<f64>,
}

// ── Config document ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PremiumConfig {
    pub operations:        HashMap<OperationId, OperationConfig>,
    pub kpis:              HashMap<KpiId, KpiConfig>,
    pub team_coefficients: HashMap<CoefficientId, TeamCoefficientConfig>,
    pub positions:         HashMap<PositionId, PositionConfig>,
    pub rules:             RulesConfig,
}

impl PremiumConfig {
    /// Load the catalog document from a data directory and validate it.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let op_path = format!("{data_dir}/operations.json");
        let op_content = std::fs::read_to_string(&op_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {op_path}: {e}"))?;
        let op_file: OperationCatalogFile = serde_json::from_str(&op_content)?;
        let operations = op_file
            .operations
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let kpi_path = format!("{data_dir}/kpis.json");
        let kpi_content = std::fs::read_to_string(&kpi_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {kpi_path}: {e}"))?;
        let kpi_file: KpiCatalogFile = serde_json::from_str(&kpi_content)?;
        let kpis = kpi_file
            .kpis
            .into_iter()
            .map(|k| (k.id.clone(), k))
            .collect();

        let coeff_path = format!("{data_dir}/team_coefficients.json");
        let coeff_content = std::fs::read_to_string(&coeff_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {coeff_path}: {e}"))?;
        let coeff_file: TeamCoefficientFile = serde_json::from_str(&coeff_content)?;
        let team_coefficients = coeff_file
            .team_coefficients
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let position_path = format!("{data_dir}/positions.json");
        let position_content = std::fs::read_to_string(&position_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {position_path}: {e}"))?;
        let position_file: PositionsFile = serde_json::from_str(&position_content)?;
        let positions = position_file
            .positions
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let rules_path = format!("{data_dir}/rules.json");
        let rules_content = std::fs::read_to_string(&rules_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {rules_path}: {e}"))?;
        let rules: RulesConfig = serde_json::from_str(&rules_content)?;

        let config = Self {
            operations,
            kpis,
            team_coefficients,
            positions,
            rules,
        };
        config.validate()?;

        log::info!(
            "config: loaded {} operations, {} KPIs, {} positions from {data_dir}",
            config.operations.len(),
            config.kpis.len(),
            config.positions.len()
        );

        Ok(config)
    }

    pub fn position(&self, position_id: &str) -> CalcResult<&PositionConfig> {
        self.positions
            .get(position_id)
            .ok_or_else(|| CalcError::PositionNotFound {
                position_id: position_id.to_string(),
            })
    }

    /// Ladder for a KPI, if both the KPI and its ladder are configured.
    pub fn kpi_ladder(&self, kpi_id: &str) -> Option<&ThresholdLadder> {
        self.kpis
            .get(kpi_id)
            .and_then(|kpi| self.rules.kpi_ladders.get(&kpi.ladder))
    }

    /// Positions sorted by id, for stable listings.
    pub fn positions_sorted(&self) -> Vec<&PositionConfig> {
        let mut positions: Vec<_> = self.positions.values().collect();
        positions.sort_by(|a, b| a.id.cmp(&b.id));
        positions
    }

    /// Operations sorted by id, for stable listings.
    pub fn operations_sorted(&self) -> Vec<&OperationConfig> {
        let mut operations: Vec<_> = self.operations.values().collect();
        operations.sort_by_key(|o| o.id);
        operations
    }

    /// Check cross-references and invariants of the catalog document.
    pub fn validate(&self) -> CalcResult<()> {
        let invalid = |reason: String| Err(CalcError::InvalidCatalog { reason });

        for op in self.operations.values() {
            let is_pvz = op.id == self.rules.pvz.operation_id;
            let is_formula = op.amount_type == AmountType::Formula;
            if is_pvz != is_formula {
                return invalid(format!(
                    "operation {} has amount type {:?} but PVZ tables price operation {}",
                    op.id, op.amount_type, self.rules.pvz.operation_id
                ));
            }
            if !op.value.is_finite() || op.value < 0.0 {
                return invalid(format!("operation {} has invalid value {}", op.id, op.value));
            }
        }

        for kpi in self.kpis.values() {
            if !self.rules.kpi_ladders.contains_key(&kpi.ladder) {
                return invalid(format!("KPI '{}' uses unknown ladder '{}'", kpi.id, kpi.ladder));
            }
        }

        for (key, ladder) in &self.rules.kpi_ladders {
            if !ladder.is_descending() {
                return invalid(format!("KPI ladder '{key}' is not sorted descending"));
            }
        }
        if !self.rules.service_ladder.is_descending() {
            return invalid("service ladder is not sorted descending".into());
        }

        if !self.kpis.contains_key(&self.rules.kpi_pool.gate_kpi) {
            return invalid(format!(
                "gate KPI '{}' is not in the KPI catalog",
                self.rules.kpi_pool.gate_kpi
            ));
        }

        if !self.rules.pvz.bucket_limits.windows(2).all(|w| w[0] < w[1]) {
            return invalid("PVZ bucket limits must be strictly ascending".into());
        }

        for position in self.positions.values() {
            if let Some(op_id) = position
                .operations
                .iter()
                .find(|id| !self.operations.contains_key(*id))
            {
                return invalid(format!(
                    "position '{}' references unknown operation {op_id}",
                    position.id
                ));
            }
            if let Some(kpi_id) = position.kpi.iter().find(|id| !self.kpis.contains_key(*id)) {
                return invalid(format!(
                    "position '{}' references unknown KPI '{kpi_id}'",
                    position.id
                ));
            }
            if let Some(coeff_id) = position
                .team_coefficients
                .iter()
                .find(|id| !self.team_coefficients.contains_key(*id))
            {
                return invalid(format!(
                    "position '{}' references unknown team coefficient '{coeff_id}'",
                    position.id
                ));
            }

            match &position.kpi_weights {
                Some(weights) => {
                    if let Some(kpi_id) = weights.keys().find(|id| !position.kpi.contains(*id)) {
                        return invalid(format!(
                            "position '{}' weights KPI '{kpi_id}' it does not declare",
                            position.id
                        ));
                    }
                    let sum: f64 = weights.values().sum();
                    if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
                        return invalid(format!(
                            "KPI weights of position '{}' sum to {sum}, expected 1.0",
                            position.id
                        ));
                    }
                }
                None if position.has_kpi() => {
                    // Surfaced per calculation as a warning, not fatal to loading.
                    log::warn!(
                        "config: position '{}' declares KPIs but has no weights",
                        position.id
                    );
                }
                None => {}
            }
        }

        Ok(())
    }

    /// The production catalog, hard-coded. Mirrors `data/`.
    pub fn builtin() -> Self {
        use AmountType::{Fixed, Formula, Percent};
        use OperationClass::{DeliverySpeed, Plain, ReceptionSpeed, Service};

        #[rustfmt::skip]
        let op_rows: [(OperationId, &str, &str, AmountType, f64, &str, OperationClass, &str, f64); 25] = [
            (1,  "Retail goods",                         "3% of amount",     Percent, 0.03,   "RUB",     Service,        "🛒", 10_000.0),
            (2,  "Retail, 16 extra items",               "5% of amount",     Percent, 0.05,   "RUB",     Service,        "🏪", 5_000.0),
            (3,  "Lottery tickets",                      "3% of amount",     Percent, 0.03,   "RUB",     Service,        "🎲", 3_000.0),
            (4,  "Subscription",                         "2% of amount",     Percent, 0.02,   "RUB",     Service,        "📰", 5_000.0),
            (5,  "SIM card, type 1",                     "50 RUB/pc",        Fixed,   50.0,   "pc",      Service,        "📱", 20.0),
            (6,  "SIM card, type 2",                     "30 RUB/pc",        Fixed,   30.0,   "pc",      Service,        "📲", 30.0),
            (7,  "SIM card, type 3",                     "10 RUB/pc",        Fixed,   10.0,   "pc",      Service,        "📞", 50.0),
            (8,  "Hyperlocal delivery",                  "50 RUB/pc",        Fixed,   50.0,   "pc",      Service,        "🔒", 20.0),
            (9,  "Payment via mobile terminal",          "3 RUB/pc",         Fixed,   3.0,    "pc",      Service,        "💳", 100.0),
            (10, "Multi-subscription",                   "30 RUB/pc",        Fixed,   30.0,   "pc",      Service,        "✍️", 50.0),
            (11, "Pensioner acquisition",                "300 RUB/person",   Fixed,   300.0,  "person",  Plain,          "👴", 10.0),
            (12, "WB order hand-out",                    "5 RUB/order",      Fixed,   5.0,    "order",   Plain,          "📦", 200.0),
            (13, "WB pickup point service",              "per table",        Formula, 0.0,    "service", Plain,          "🏢", 10.0),
            (14, "C2C prof client return",               "1000 RUB/client",  Fixed,   1000.0, "client",  Plain,          "🔄", 5.0),
            (15, "EMS sale",                             "40 RUB/service",   Fixed,   40.0,   "service", ReceptionSpeed, "📨", 50.0),
            (16, "Prepaid EMS acceptance",               "50 RUB/pc",        Fixed,   50.0,   "pc",      ReceptionSpeed, "📮", 30.0),
            (17, "Registered parcel acceptance",         "5 RUB/pc",         Fixed,   5.0,    "pc",      ReceptionSpeed, "📦", 100.0),
            (18, "Registered letter acceptance",         "0.5 RUB/pc",       Fixed,   0.5,    "pc",      ReceptionSpeed, "✉️", 200.0),
            (19, "Prepaid registered parcel acceptance", "7 RUB/pc",         Fixed,   7.0,    "pc",      ReceptionSpeed, "📮", 80.0),
            (20, "Prepaid registered letter acceptance", "1 RUB/pc",         Fixed,   1.0,    "pc",      ReceptionSpeed, "📧", 150.0),
            (21, "Registered parcel delivery",           "2 RUB/pc",         Fixed,   2.0,    "pc",      DeliverySpeed,  "📬", 100.0),
            (22, "E-commerce delivery",                  "0.5 RUB/pc",       Fixed,   0.5,    "pc",      DeliverySpeed,  "📫", 200.0),
            (23, "E-commerce acceptance",                "0.5 RUB/pc",       Fixed,   0.5,    "pc",      ReceptionSpeed, "📪", 200.0),
            (24, "Other transactions",                   "0.5 RUB/pc",       Fixed,   0.5,    "pc",      Service,        "💳", 100.0),
            (25, "Project participation",                "10 RUB/service",   Fixed,   10.0,   "service", Plain,          "🚀", 30.0),
        ];
        let operations = op_rows
            .into_iter()
            .map(|(id, name, rate_label, amount_type, value, unit, operation_class, emoji, max)| {
                (
                    id,
                    OperationConfig {
                        id,
                        name: name.into(),
                        rate_label: rate_label.into(),
                        amount_type,
                        value,
                        unit: unit.into(),
                        operation_class,
                        emoji: emoji.into(),
                        max_reasonable: Some(max),
                    },
                )
            })
            .collect();

        let kpi_rows = [
            ("revenue",    "Office revenue",      "revenue", "💰", "80%+ required for any KPI bonus"),
            ("csi",        "CSI score",           "csi",     "⭐", "Customer satisfaction index"),
            ("online_rpo", "Online RPO share",    "plan",    "🌐", "Share of registered items accepted online"),
            ("co1_co2",    "CO1/CO2",             "plan",    "📊", "CO1/CO2 plan attainment"),
        ];
        let kpis = kpi_rows
            .into_iter()
            .map(|(id, name, ladder, emoji, description)| {
                (
                    id.to_string(),
                    KpiConfig {
                        id: id.into(),
                        name: name.into(),
                        ladder: ladder.into(),
                        emoji: emoji.into(),
                        description: description.into(),
                    },
                )
            })
            .collect();

        let coeff_rows = [
            (SERVICE,         "Service (CSI)",   CoefficientKind::Score,   "⭐", "Scales class 2 operations"),
            (SPEED_RECEPTION, "Reception speed", CoefficientKind::Time,    "⚡", "Scales class 3 operations. Norm: under 4 min"),
            (SPEED_DELIVERY,  "Delivery speed",  CoefficientKind::Time,    "🚚", "Scales class 4 operations. Norm: under 1:30 min"),
            (EFFICIENCY,      "Office efficiency", CoefficientKind::Percent, "📈", "Revenue plan percent; 100%+ adds 30% to operations"),
        ];
        let team_coefficients = coeff_rows
            .into_iter()
            .map(|(id, name, kind, emoji, description)| {
                (
                    id.to_string(),
                    TeamCoefficientConfig {
                        id: id.into(),
                        name: name.into(),
                        kind,
                        emoji: emoji.into(),
                        description: description.into(),
                    },
                )
            })
            .collect();

        let nops_weights: HashMap<KpiId, f64> = [
            ("revenue".to_string(), 0.30),
            ("csi".to_string(), 0.40),
            ("online_rpo".to_string(), 0.15),
            ("co1_co2".to_string(), 0.15),
        ]
        .into();
        let all_kpi: Vec<KpiId> = ["revenue", "csi", "online_rpo", "co1_co2"]
            .into_iter()
            .map(String::from)
            .collect();
        let ids = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let positions = vec![
            PositionConfig {
                id: "operator".into(),
                name: "Operator, class 1-3".into(),
                emoji: "👨‍💼".into(),
                operations: vec![1, 3, 4, 5, 6, 7, 10, 11, 12, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24],
                kpi: vec![],
                team_coefficients: ids(&[SERVICE, SPEED_RECEPTION, SPEED_DELIVERY, EFFICIENCY]),
                kpi_weights: None,
                has_team_bonus: false,
            },
            PositionConfig {
                id: "nops_operational".into(),
                name: "Office head without operators".into(),
                emoji: "👨‍💼".into(),
                operations: vec![1, 3, 4, 5, 6, 7, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 22, 23, 24, 25],
                kpi: all_kpi.clone(),
                team_coefficients: vec![],
                kpi_weights: Some(nops_weights.clone()),
                has_team_bonus: false,
            },
            PositionConfig {
                id: "nops_management".into(),
                name: "Office head with operators".into(),
                emoji: "👨‍✈️".into(),
                operations: vec![10, 11, 12, 13, 14, 25],
                kpi: all_kpi,
                team_coefficients: vec![],
                kpi_weights: Some(nops_weights),
                has_team_bonus: true,
            },
            PositionConfig {
                id: "admin".into(),
                name: "Administrator".into(),
                emoji: "👨‍💻".into(),
                operations: vec![3, 11, 16, 19, 20],
                kpi: ids(&["revenue", "csi", "online_rpo"]),
                team_coefficients: ids(&[SERVICE, SPEED_RECEPTION, SPEED_DELIVERY]),
                kpi_weights: Some(
                    [
                        ("revenue".to_string(), 0.30),
                        ("csi".to_string(), 0.40),
                        ("online_rpo".to_string(), 0.30),
                    ]
                    .into(),
                ),
                has_team_bonus: false,
            },
            PositionConfig {
                id: "postman".into(),
                name: "Postman".into(),
                emoji: "🚶‍♂️".into(),
                operations: vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 25],
                kpi: vec![],
                team_coefficients: ids(&[SERVICE, EFFICIENCY]),
                kpi_weights: None,
                has_team_bonus: false,
            },
            PositionConfig {
                id: "chief_specialist".into(),
                name: "Chief postal service specialist".into(),
                emoji: "👨‍🔬".into(),
                operations: (1..=25).collect(),
                kpi: vec![],
                team_coefficients: ids(&[SERVICE, SPEED_RECEPTION, SPEED_DELIVERY, EFFICIENCY]),
                kpi_weights: None,
                has_team_bonus: false,
            },
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

        let rules = RulesConfig {
            service_ladder: ThresholdLadder::new(&[(95.0, 1.2), (90.0, 1.1), (80.0, 1.0)], 1.0),
            kpi_ladders: [
                (
                    "revenue".to_string(),
                    ThresholdLadder::new(
                        &[
                            (110.0, 1.0),
                            (105.0, 0.8),
                            (100.0, 0.6),
                            (95.0, 0.4),
                            (90.0, 0.2),
                            (85.0, 0.1),
                            (80.0, 0.05),
                        ],
                        0.0,
                    ),
                ),
                (
                    "plan".to_string(),
                    ThresholdLadder::new(
                        &[
                            (110.0, 1.0),
                            (105.0, 0.8),
                            (100.0, 0.6),
                            (95.0, 0.4),
                            (90.0, 0.2),
                            (85.0, 0.1),
                        ],
                        0.0,
                    ),
                ),
                (
                    "csi".to_string(),
                    ThresholdLadder::new(&[(95.0, 1.0), (90.0, 0.6), (85.0, 0.2)], 0.0),
                ),
            ]
            .into(),
            kpi_pool: KpiPoolRule {
                pool_share:      0.20,
                fallback_salary: 150_000.0,
                gate_kpi:        "revenue".into(),
                gate_percent:    80.0,
            },
            efficiency: EfficiencyRule {
                threshold:   100.0,
                bonus_share: 0.30,
            },
            speed: SpeedNorms {
                reception_minutes: 4.0,
                delivery_minutes:  1.5,
                met:               1.5,
                missed:            0.5,
                not_applicable:    1.0,
            },
            pvz: PvzTables {
                operation_id:  13,
                bucket_limits: [50, 100, 166],
                schedule_amounts: [
                    [0.0,    1000.0, 2000.0, 3000.0],
                    [1000.0, 2000.0, 3000.0, 3000.0],
                    [2000.0, 3000.0, 3000.0, 3000.0],
                    [3000.0, 3000.0, 3000.0, 3000.0],
                ],
                rating_amounts: [
                    [0.0,    1500.0, 3000.0, 4500.0],
                    [1500.0, 3000.0, 4500.0, 4500.0],
                    [3000.0, 4500.0, 4500.0, 4500.0],
                    [4500.0, 4500.0, 4500.0, 4500.0],
                ],
            },
            position_rates: vec![0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3],
        };

        Self {
            operations,
            kpis,
            team_coefficients,
            positions,
            rules,
        }
    }
}
