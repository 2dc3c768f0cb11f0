// Application state for HTTP handlers
use crate::application::analysis_service::AnalysisService;
use crate::application::dosing_service::DosingService;
use crate::application::equipment_service::EquipmentService;
use crate::application::icp_service::IcpService;
use crate::application::livestock_service::LivestockService;

#[derive(Clone)]
pub struct AppState {
    pub analysis_service: AnalysisService,
    pub equipment_service: EquipmentService,
    pub livestock_service: LivestockService,
    pub icp_service: IcpService,
    pub dosing_service: DosingService,
    /// Server-wide switch; clients must also accept `br`.
    pub compress_responses: bool,
}
