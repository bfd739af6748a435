mod employment_type;
mod job_record;

pub use employment_type::EmploymentType;
pub use job_record::{
    GenerationRequest, JobRecord, COMPANY_PLACEHOLDER, DEFAULT_STATUS, SALARY_UNKNOWN,
};
