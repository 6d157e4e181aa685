//! The resource types of the model, with their backbone elements

pub mod account;
pub mod clinical_impression;
pub mod device_use_statement;
pub mod questionnaire_response;
pub mod risk_assessment;
pub mod service_request;
pub mod supply_delivery;

pub use account::{Account, AccountBuilder};
pub use clinical_impression::{ClinicalImpression, ClinicalImpressionBuilder};
pub use device_use_statement::{DeviceUseStatement, DeviceUseStatementBuilder};
pub use questionnaire_response::{QuestionnaireResponse, QuestionnaireResponseBuilder};
pub use risk_assessment::{RiskAssessment, RiskAssessmentBuilder};
pub use service_request::{ServiceRequest, ServiceRequestBuilder};
pub use supply_delivery::{SupplyDelivery, SupplyDeliveryBuilder};
