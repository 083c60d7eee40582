//! Report generation and saved-report history.

use crate::client::{Ack, ApiClient, ApiError, Envelope, RequestContext};
use crate::types::{GeneratedReport, ReportRequest, ReportResponse, ReportSummary};

impl ApiClient {
    /// Generates a report over a knowledge base. The server also files the
    /// result under the returned history id.
    pub async fn generate_report(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        request: &ReportRequest,
    ) -> Result<GeneratedReport, ApiError> {
        let response: ReportResponse = self
            .post_json(ctx, &format!("api/knowledge-base/{kb_id}/generate-report"), request)
            .await?;
        if response.status != "success" {
            let detail = response
                .detail
                .unwrap_or_else(|| "report generation failed".to_string());
            return Err(ApiError::Api(detail));
        }
        let report = response
            .report
            .ok_or_else(|| ApiError::Decode("missing report field".to_string()))?;
        Ok(GeneratedReport {
            report,
            id: response.id,
        })
    }

    /// Lists saved reports for a knowledge base, newest first.
    pub async fn report_history(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
    ) -> Result<Vec<ReportSummary>, ApiError> {
        let envelope: Envelope<Vec<ReportSummary>> = self
            .get_json(ctx, &format!("api/knowledge-base/{kb_id}/reports"))
            .await?;
        envelope.into_data()
    }

    pub async fn delete_report(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        report_id: &str,
    ) -> Result<String, ApiError> {
        let ack: Ack = self
            .delete_json(ctx, &format!("api/knowledge-base/{kb_id}/reports/{report_id}"))
            .await?;
        ack.into_message()
    }
}
