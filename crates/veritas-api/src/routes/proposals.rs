//! Static DAO governance proposals.
//!
//! The catalog is fixed; only `endTime` moves, relative to the time of the
//! request.

use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProposalStatus {
    Draft,
    Active,
    Passed,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    /// Percentage of votes in favor.
    pub votes_for: u32,
    pub votes_against: u32,
    pub end_time: DateTime<Utc>,
    pub proposer: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProposalsResponse {
    pub proposals: Vec<Proposal>,
    pub total: usize,
    /// Number of proposals with status `Active`.
    pub active: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/proposals", get(list_proposals))
}

struct Seed {
    id: u64,
    title: &'static str,
    description: &'static str,
    status: ProposalStatus,
    votes: (u32, u32),
    ends_in_days: i64,
    proposer: &'static str,
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: 123,
        title: "Tokenomics Update",
        description: "Increase staking rewards from 5% to 7% APY and reduce inflation rate by 2%",
        status: ProposalStatus::Active,
        votes: (67, 33),
        ends_in_days: 3,
        proposer: "0x1234...5678",
    },
    Seed {
        id: 124,
        title: "Treasury Diversification",
        description: "Allocate 20% of treasury to DeFi yield farming and invest in blue-chip NFTs",
        status: ProposalStatus::Passed,
        votes: (89, 11),
        ends_in_days: -1,
        proposer: "0x2345...6789",
    },
    Seed {
        id: 125,
        title: "Governance Token Distribution",
        description: "Airdrop 1M tokens to active community members with 12-month linear vesting",
        status: ProposalStatus::Draft,
        votes: (0, 0),
        ends_in_days: 7,
        proposer: "0x3456...7890",
    },
    Seed {
        id: 126,
        title: "Partnership with DeFi Protocol",
        description:
            "Establish strategic partnership with leading DeFi protocol for cross-chain integration",
        status: ProposalStatus::Active,
        votes: (45, 55),
        ends_in_days: 1,
        proposer: "0x4567...8901",
    },
    Seed {
        id: 127,
        title: "Community Rewards Program",
        description:
            "Launch comprehensive rewards program for active contributors and early adopters",
        status: ProposalStatus::Completed,
        votes: (92, 8),
        ends_in_days: -5,
        proposer: "0x5678...9012",
    },
];

/// The proposal catalog with end times relative to `now`.
pub fn catalog(now: DateTime<Utc>) -> Vec<Proposal> {
    SEEDS
        .iter()
        .map(|seed| Proposal {
            id: seed.id,
            title: seed.title.into(),
            description: seed.description.into(),
            status: seed.status,
            votes_for: seed.votes.0,
            votes_against: seed.votes.1,
            end_time: now + Duration::days(seed.ends_in_days),
            proposer: seed.proposer.into(),
        })
        .collect()
}

/// GET /api/proposals: List governance proposals.
#[utoipa::path(
    get,
    path = "/api/proposals",
    responses(
        (status = 200, description = "Proposal catalog", body = ProposalsResponse),
    ),
    tag = "governance"
)]
pub(crate) async fn list_proposals() -> Json<ProposalsResponse> {
    let proposals = catalog(Utc::now());
    let active = proposals
        .iter()
        .filter(|p| p.status == ProposalStatus::Active)
        .count();
    Json(ProposalsResponse {
        total: proposals.len(),
        active,
        proposals,
    })
}
