//! Multi-field filter pipeline and result assembly.
//!
//! Every active predicate is AND-combined per job. The output is a stable
//! subsequence of the input: no scoring, no re-ordering, no pagination.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::debug;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::search::criteria::SearchCriteria;
use crate::search::fuzzy::is_fuzzy_match;
use crate::search::salary::parse_min_salary;
use crate::search::tokenizer::query_terms;
use crate::store::JobStore;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Criteria prepared for evaluation against many jobs at a fixed instant.
pub struct JobFilter<'a> {
    criteria: &'a SearchCriteria,
    terms: Vec<String>,
    now: DateTime<Utc>,
}

impl<'a> JobFilter<'a> {
    pub fn new(criteria: &'a SearchCriteria, now: DateTime<Utc>) -> Self {
        Self {
            criteria,
            terms: query_terms(&criteria.query),
            now,
        }
    }

    /// Pass/fail decision for a single job.
    pub fn matches(&self, job: &JobPosting) -> bool {
        self.matches_text(job)
            && self
                .criteria
                .job_type
                .map_or(true, |t| job.job_type == t)
            && self
                .criteria
                .department
                .as_deref()
                .map_or(true, |d| job.department == d)
            && self
                .criteria
                .experience_level
                .map_or(true, |l| job.experience_level == l)
            && self
                .criteria
                .posted_within_days
                .map_or(true, |w| days_since(job, self.now) <= u64::from(w))
            && self
                .criteria
                .min_salary
                .map_or(true, |m| parse_min_salary(&job.salary_range) >= m)
    }

    /// Every query term must fuzzy-match the job's combined text.
    fn matches_text(&self, job: &JobPosting) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let text = job.search_text();
        self.terms.iter().all(|term| is_fuzzy_match(&text, term))
    }
}

/// Whole days between the posting date (midnight UTC) and `now`, rounded up.
fn days_since(job: &JobPosting, now: DateTime<Utc>) -> u64 {
    let posted = job.posted_at.and_time(NaiveTime::MIN).and_utc();
    let millis = (now - posted).num_milliseconds().unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY)
}

/// Applies `criteria` to `jobs`, preserving their relative order.
pub fn filter_jobs(
    jobs: &[JobPosting],
    criteria: &SearchCriteria,
    now: DateTime<Utc>,
) -> Vec<JobPosting> {
    if criteria.is_unconstrained() {
        return jobs.to_vec();
    }
    let filter = JobFilter::new(criteria, now);
    jobs.iter().filter(|job| filter.matches(job)).cloned().collect()
}

/// Loads a fresh snapshot of the catalogue and returns the matching jobs.
pub async fn search_jobs(
    store: &dyn JobStore,
    criteria: &SearchCriteria,
) -> Result<Vec<JobPosting>, AppError> {
    let jobs = store.list_jobs().await?;
    let results = filter_jobs(&jobs, criteria, Utc::now());

    debug!(
        "Job search matched {}/{} postings (query={:?})",
        results.len(),
        jobs.len(),
        criteria.query
    );

    Ok(results)
}
