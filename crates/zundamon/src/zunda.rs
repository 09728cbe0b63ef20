//! Zunda-mochi calculator.

use serde_json::Value;

use crate::types::{PeoplePolicy, ZundaError, ZundaEstimate, ZundaResult};

/// Zunda-mochi served to each person.
pub const ZUNDA_PER_PERSON: u64 = 3;

/// People assumed when no count is given.
pub const DEFAULT_PEOPLE: u64 = 1;

/// Compute how many zunda-mochi `people` guests need.
pub fn estimate(people: u64) -> ZundaEstimate {
    ZundaEstimate {
        people,
        total: people as u128 * ZUNDA_PER_PERSON as u128,
    }
}

impl PeoplePolicy {
    /// Turn a raw `people` argument into a head count.
    ///
    /// A missing value always means [`DEFAULT_PEOPLE`]. Anything that is not a
    /// JSON integer of at least 1 is either replaced by [`DEFAULT_PEOPLE`] or
    /// rejected, depending on the policy.
    pub fn resolve(self, raw: Option<&Value>) -> ZundaResult<u64> {
        let Some(raw) = raw else {
            return Ok(DEFAULT_PEOPLE);
        };

        match raw.as_u64().filter(|n| *n >= 1) {
            Some(people) => Ok(people),
            None => match self {
                PeoplePolicy::Normalize => {
                    tracing::warn!("Invalid people count {raw}, using {DEFAULT_PEOPLE}");
                    Ok(DEFAULT_PEOPLE)
                }
                PeoplePolicy::Reject => Err(ZundaError::InvalidPeople(raw.to_string())),
            },
        }
    }
}

/// Resolve the argument and compute the estimate in one step.
pub fn calculate(raw: Option<&Value>, policy: PeoplePolicy) -> ZundaResult<ZundaEstimate> {
    let people = policy.resolve(raw)?;
    let result = estimate(people);
    tracing::info!("Calculated: {result}");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estimate_five_people() {
        let e = estimate(5);
        assert_eq!(e.total, 15);
        assert_eq!(e.to_string(), "5人分のずんだもちは15個必要なのだ！");
    }

    #[test]
    fn test_missing_defaults_to_one() {
        let e = calculate(None, PeoplePolicy::Normalize).unwrap();
        assert_eq!((e.people, e.total), (1, 3));

        let e = calculate(None, PeoplePolicy::Reject).unwrap();
        assert_eq!(e.people, 1);
    }

    #[test]
    fn test_invalid_values_normalize() {
        for raw in [json!(-2), json!(0), json!(2.5), json!("4"), json!(true), json!(null)] {
            let e = calculate(Some(&raw), PeoplePolicy::Normalize).unwrap();
            assert_eq!((e.people, e.total), (1, 3), "input {raw}");
        }
    }

    #[test]
    fn test_invalid_values_rejected_in_strict_mode() {
        let err = calculate(Some(&json!(-2)), PeoplePolicy::Reject).unwrap_err();
        assert_eq!(err, ZundaError::InvalidPeople("-2".to_string()));
        assert!(err.to_string().contains("-2"));
    }

    #[test]
    fn test_huge_count_does_not_overflow() {
        let e = estimate(u64::MAX);
        assert_eq!(e.total, u64::MAX as u128 * 3);
    }
}
