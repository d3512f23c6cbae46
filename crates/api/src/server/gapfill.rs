#![forbid(unsafe_code)]

use super::RosterServer;
use crate::advisor::{RankAdvisor as _, RerankRequest};
use crate::support::args::{
    as_object, optional_bool, optional_string, optional_u32, require_store_id, require_string,
};
use crate::support::envelope::{envelope_error, envelope_ok, store_error_envelope};
use crate::support::time::ts_ms_to_rfc3339;
use rd_core::gapfill::{GapFillParams, GapFillSnapshot, apply_advisor_order, build_suggestions};
use serde_json::{Value, json};
use std::collections::BTreeMap;

const DEFAULT_MAX_PER_SHIFT: u32 = 3;
const MAX_PER_SHIFT_CAP: u32 = 10;

impl RosterServer {
    pub(crate) fn action_gap_fill(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let store_id = match require_store_id(args, "store_id") {
            Ok(store_id) => store_id,
            Err(resp) => return resp,
        };
        let week_id = match require_string(args, "week_id") {
            Ok(week_id) => week_id,
            Err(resp) => return resp,
        };
        let role_filter = match optional_string(args, "role") {
            Ok(role_filter) => role_filter,
            Err(resp) => return resp,
        };
        let max_per_shift = match optional_u32(args, "max_per_shift") {
            Ok(max_per_shift) => max_per_shift.unwrap_or(DEFAULT_MAX_PER_SHIFT),
            Err(resp) => return resp,
        };
        if !(1..=MAX_PER_SHIFT_CAP).contains(&max_per_shift) {
            return envelope_error("INVALID_INPUT", "max_per_shift must be between 1 and 10");
        }
        let use_advisor = match optional_bool(args, "use_advisor") {
            Ok(use_advisor) => use_advisor.unwrap_or(false),
            Err(resp) => return resp,
        };

        let snapshot = match self.store_mut().gap_fill_snapshot(&store_id, &week_id) {
            Ok(snapshot) => snapshot,
            Err(err) => return store_error_envelope(err),
        };
        let params = GapFillParams {
            role_filter,
            max_per_shift: max_per_shift as usize,
        };
        let mut outcome = build_suggestions(&snapshot, &params);

        // Reranking happens after all transactions closed; one advisor call
        // per gapped shift that actually has an ordering to improve.
        if use_advisor {
            for suggestion in &mut outcome.suggestions {
                if suggestion.candidates.len() < 2 {
                    continue;
                }
                let Some(request) = rerank_request(&snapshot, suggestion.shift_id.as_str(), &suggestion.candidates)
                else {
                    continue;
                };
                let Some(advised) = self.advisor.rerank(&request) else {
                    continue;
                };
                match apply_advisor_order(&suggestion.candidates, &advised) {
                    Some(order) => suggestion.candidates = order,
                    None => {
                        tracing::debug!(
                            shift_id = %suggestion.shift_id,
                            "advisor order rejected, keeping local ranking"
                        );
                    }
                }
            }
        }

        envelope_ok(
            "gap_fill",
            json!({
                "suggestions": outcome
                    .suggestions
                    .iter()
                    .map(|s| json!({
                        "shift_id": s.shift_id,
                        "needed_slots": s.needed_slots,
                        "suggested_employee_ids": s.candidates,
                    }))
                    .collect::<Vec<_>>(),
                "note": outcome.note,
            }),
        )
    }
}

fn rerank_request(
    snapshot: &GapFillSnapshot,
    shift_id: &str,
    candidates: &[String],
) -> Option<RerankRequest> {
    let schedule = snapshot.schedule.as_ref()?;
    let shift = schedule.shifts.iter().find(|s| s.shift_id == shift_id)?;

    let mut assignment_counts: BTreeMap<String, u32> = candidates
        .iter()
        .map(|employee| (employee.clone(), 0))
        .collect();
    for other in &schedule.shifts {
        for employee in &other.assigned {
            if let Some(count) = assignment_counts.get_mut(employee) {
                *count += 1;
            }
        }
    }

    Some(RerankRequest {
        shift_role: shift.role.clone(),
        shift_start: ts_ms_to_rfc3339(shift.window.start_ms()),
        shift_end: ts_ms_to_rfc3339(shift.window.end_ms()),
        candidates: candidates.to_vec(),
        assignment_counts,
    })
}
