//! hickory-server request handler: the wire-facing side of the
//! resolution decision.
//!
//! Question names are decoded to text and handed to the resolve use
//! case. A local decision is answered with synthesized A records; a
//! forward decision relays the original query to the upstream
//! resolver and passes its answer sections and response code back
//! unmodified. Upstream failures turn into SERVFAIL for that query
//! only.

use crate::dns::upstream::UdpUpstream;
use async_trait::async_trait;
use harbor_dns_application::{LocalRecord, Resolution, ResolveQueryUseCase};
use harbor_dns_domain::DomainError;
use hickory_proto::op::{Header, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::collections::HashMap;
use tracing::{debug, error, warn};

pub struct DnsServerHandler {
    resolver: ResolveQueryUseCase,
    upstream: UdpUpstream,
}

impl DnsServerHandler {
    pub fn new(resolver: ResolveQueryUseCase, upstream: UdpUpstream) -> Self {
        Self { resolver, upstream }
    }

    /// Dot-joined, case-preserving text of a query name, without the
    /// trailing root dot.
    fn question_text(name: &hickory_proto::rr::Name) -> String {
        let text = name.to_utf8();
        text.trim_end_matches('.').to_string()
    }

    /// Re-serialize the client's question section under its original
    /// message id and send it upstream.
    async fn forward_upstream(&self, request: &Request) -> Result<Message, DomainError> {
        let mut message = Message::new(request.id(), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        for query in request.queries() {
            message.add_query(query.original().clone());
        }

        let mut wire = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut wire);
        message.emit(&mut encoder).map_err(|e| {
            DomainError::UpstreamError(format!("Failed to serialize query: {e}"))
        })?;

        let response = self.upstream.forward(&wire).await?;
        Message::from_vec(&response).map_err(|e| {
            DomainError::UpstreamError(format!("Malformed upstream response: {e}"))
        })
    }

    async fn send_local<R: ResponseHandler>(
        &self,
        request: &Request,
        records: Vec<LocalRecord>,
        mut response_handle: R,
    ) -> ResponseInfo {
        let by_name: HashMap<&str, &LocalRecord> =
            records.iter().map(|r| (r.name.as_str(), r)).collect();

        // Owner names come from the request so casing is preserved
        // exactly as queried.
        let mut answers = Vec::with_capacity(records.len());
        for query in request.queries() {
            let owner = query.original().name();
            let text = Self::question_text(owner);
            if let Some(record) = by_name.get(text.as_str()) {
                answers.push(Record::from_rdata(
                    owner.clone(),
                    record.ttl,
                    RData::A(A(record.address)),
                ));
            }
        }

        debug!(answers = answers.len(), "Answering locally");

        let mut header = Header::response_from_request(request.header());
        header.set_recursion_available(true);

        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(
            header,
            answers.iter(),
            std::iter::empty(),
            std::iter::empty(),
            std::iter::empty(),
        );
        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send local response");
                serve_failed(request)
            }
        }
    }

    async fn send_forwarded<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let upstream_response = match self.forward_upstream(request).await {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, upstream = %self.upstream.server_addr(), "Upstream resolution failed");
                let header = failed_header(request);
                let builder = MessageResponseBuilder::from_message_request(request);
                let response = builder.build_no_records(header);
                return match response_handle.send_response(response).await {
                    Ok(info) => info,
                    Err(e) => {
                        error!(error = %e, "Failed to send SERVFAIL response");
                        serve_failed(request)
                    }
                };
            }
        };

        let mut header = Header::response_from_request(request.header());
        header.set_response_code(upstream_response.response_code());
        header.set_recursion_available(upstream_response.recursion_available());
        header.set_authoritative(upstream_response.authoritative());
        header.set_truncated(upstream_response.truncated());

        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(
            header,
            upstream_response.answers().iter(),
            upstream_response.name_servers().iter(),
            std::iter::empty(),
            upstream_response.additionals().iter(),
        );
        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send forwarded response");
                serve_failed(request)
            }
        }
    }
}

fn failed_header(request: &Request) -> Header {
    let mut header = Header::response_from_request(request.header());
    header.set_response_code(ResponseCode::ServFail);
    header
}

fn serve_failed(request: &Request) -> ResponseInfo {
    ResponseInfo::from(failed_header(request))
}

#[async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        let questions: Vec<String> = request
            .queries()
            .iter()
            .map(|query| Self::question_text(query.original().name()))
            .collect();

        debug!(src = %request.src(), questions = ?questions, "Query received");

        match self.resolver.resolve(&questions) {
            Resolution::Local(records) => {
                self.send_local(request, records, response_handle).await
            }
            Resolution::Forward => self.send_forwarded(request, response_handle).await,
        }
    }
}
