//! Built-in workflow definitions

use super::{FieldKind, FieldOption, WorkflowDefinition, WorkflowField};

const fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption { value, label }
}

pub(super) static WORKFLOWS: &[WorkflowDefinition] = &[
    WorkflowDefinition {
        id: "add-invoice-xero",
        name: "Add Invoice to Xero",
        description: "Add a new invoice to your Xero accounting system",
        fields: &[
            WorkflowField {
                name: "invoiceType",
                label: "Invoice Type",
                kind: FieldKind::Select,
                options: &[
                    opt("sales", "Sales Invoice"),
                    opt("purchase", "Purchase Invoice"),
                    opt("credit", "Credit Note"),
                ],
            },
            WorkflowField {
                name: "supplierName",
                label: "Supplier Name",
                kind: FieldKind::Select,
                options: &[
                    opt("acme-corp", "Acme Corporation"),
                    opt("tech-solutions", "Tech Solutions Ltd"),
                    opt("office-supplies", "Office Supplies Co"),
                ],
            },
            WorkflowField {
                name: "amount",
                label: "Amount",
                kind: FieldKind::Text,
                options: &[],
            },
        ],
    },
    WorkflowDefinition {
        id: "financial-analysis",
        name: "Financial Analysis",
        description: "Generate comprehensive financial analysis reports",
        fields: &[
            WorkflowField {
                name: "analysisType",
                label: "Analysis Type",
                kind: FieldKind::Select,
                options: &[
                    opt("profit-loss", "Profit & Loss"),
                    opt("cash-flow", "Cash Flow"),
                    opt("balance-sheet", "Balance Sheet"),
                ],
            },
            WorkflowField {
                name: "period",
                label: "Period",
                kind: FieldKind::Select,
                options: &[
                    opt("monthly", "Monthly"),
                    opt("quarterly", "Quarterly"),
                    opt("annual", "Annual"),
                ],
            },
        ],
    },
    WorkflowDefinition {
        id: "risk-assessment",
        name: "Risk Assessment",
        description: "Evaluate and analyze business risks",
        fields: &[
            WorkflowField {
                name: "riskCategory",
                label: "Risk Category",
                kind: FieldKind::Select,
                options: &[
                    opt("financial", "Financial Risk"),
                    opt("operational", "Operational Risk"),
                    opt("compliance", "Compliance Risk"),
                ],
            },
            WorkflowField {
                name: "severity",
                label: "Severity Level",
                kind: FieldKind::Select,
                options: &[
                    opt("low", "Low"),
                    opt("medium", "Medium"),
                    opt("high", "High"),
                    opt("critical", "Critical"),
                ],
            },
        ],
    },
    WorkflowDefinition {
        id: "compliance-check",
        name: "Compliance Check",
        description: "Verify compliance with regulations and policies",
        fields: &[
            WorkflowField {
                name: "complianceType",
                label: "Compliance Type",
                kind: FieldKind::Select,
                options: &[
                    opt("tax", "Tax Compliance"),
                    opt("regulatory", "Regulatory Compliance"),
                    opt("internal", "Internal Policy"),
                ],
            },
            WorkflowField {
                name: "jurisdiction",
                label: "Jurisdiction",
                kind: FieldKind::Select,
                options: &[
                    opt("federal", "Federal"),
                    opt("state", "State"),
                    opt("local", "Local"),
                ],
            },
        ],
    },
];
