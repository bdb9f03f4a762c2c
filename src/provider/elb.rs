//! Elastic Load Balancing (v2) implementations of the provider traits.
//!
//! Covers application, network and gateway load balancers; all of them
//! share the same attribute keys for access logging.
use async_trait::async_trait;
use rusoto_elbv2::{
    DescribeLoadBalancersInput, Elb, ElbClient, LoadBalancer, LoadBalancerAttribute,
    ModifyLoadBalancerAttributesInput,
};

use super::LoggingProvider;
use crate::batch::{ResourceDescriptor, ResourceId};
use crate::types::UtilResult;
use crate::walker::{Page, Paginated};

/// Provider wrapping a shared `ElbClient`.
pub struct ElbProvider {
    client: ElbClient,
}

impl ElbProvider {
    /// Constructs a new provider around an existing client.
    pub fn new(client: ElbClient) -> ElbProvider {
        ElbProvider { client }
    }
}

#[async_trait]
impl LoggingProvider for ElbProvider {
    /// Enables access logging via `ModifyLoadBalancerAttributes`.
    async fn enable_logging(
        &self,
        resource: &ResourceId,
        bucket: &str,
        prefix: &str,
    ) -> UtilResult<()> {
        let request = ModifyLoadBalancerAttributesInput {
            load_balancer_arn: resource.handle().to_string(),
            attributes: logging_attributes(bucket, prefix),
        };

        self.client.modify_load_balancer_attributes(request).await?;
        Ok(())
    }
}

#[async_trait]
impl Paginated for ElbProvider {
    type Item = ResourceDescriptor;

    /// Fetches a page of load balancers via `DescribeLoadBalancers`.
    async fn page(&self, token: Option<String>) -> UtilResult<Page<ResourceDescriptor>> {
        let request = DescribeLoadBalancersInput {
            marker: token,
            ..DescribeLoadBalancersInput::default()
        };

        let output = self.client.describe_load_balancers(request).await?;

        Ok(Page {
            items: output
                .load_balancers
                .unwrap_or_default()
                .into_iter()
                .filter_map(describe)
                .collect(),
            next: output.next_marker,
        })
    }
}

/// Builds the attribute set which turns on access logging.
fn logging_attributes(bucket: &str, prefix: &str) -> Vec<LoadBalancerAttribute> {
    let pairs = [
        ("access_logs.s3.enabled", "true"),
        ("access_logs.s3.bucket", bucket),
        ("access_logs.s3.prefix", prefix),
    ];

    pairs
        .iter()
        .map(|(key, value)| LoadBalancerAttribute {
            key: Some(key.to_string()),
            value: Some(value.to_string()),
        })
        .collect()
}

/// Converts a `LoadBalancer` to a descriptor, if it has a name and ARN.
fn describe(lb: LoadBalancer) -> Option<ResourceDescriptor> {
    let name = lb.load_balancer_name?;
    let arn = lb.load_balancer_arn?;

    Some(ResourceDescriptor {
        id: ResourceId::with_handle(&name, &arn)?,
        kind: lb.type_,
    })
}

#[cfg(test)]
mod tests {
    use super::ElbProvider;
    use crate::batch::ResourceId;
    use crate::provider::LoggingProvider;
    use crate::walker::Paginated;

    use rusoto_core::signature::{SignedRequest, SignedRequestPayload};
    use rusoto_core::Region;
    use rusoto_elbv2::{ElbClient, LoadBalancer};
    use rusoto_mock::{MockCredentialsProvider, MockRequestDispatcher};

    /// Flattens query parameters, wherever they were encoded, into a form string.
    fn form(request: &SignedRequest) -> String {
        let mut parts: Vec<String> = request
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value.as_deref().unwrap_or("")))
            .collect();

        if let Some(SignedRequestPayload::Buffer(body)) = &request.payload {
            parts.push(String::from_utf8_lossy(body).into_owned());
        }

        parts.join("&")
    }

    fn provider(dispatcher: MockRequestDispatcher) -> ElbProvider {
        ElbProvider::new(ElbClient::new_with(
            dispatcher,
            MockCredentialsProvider,
            Region::UsEast1,
        ))
    }

    #[tokio::test]
    async fn describing_a_page_of_load_balancers() {
        let body = r#"<DescribeLoadBalancersResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
              <DescribeLoadBalancersResult>
                <LoadBalancers>
                  <member>
                    <LoadBalancerArn>arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/net/edge/1</LoadBalancerArn>
                    <LoadBalancerName>edge</LoadBalancerName>
                    <Type>network</Type>
                  </member>
                  <member>
                    <LoadBalancerArn>arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/app/web/2</LoadBalancerArn>
                    <LoadBalancerName>web</LoadBalancerName>
                    <Type>application</Type>
                  </member>
                </LoadBalancers>
                <NextMarker>page-3</NextMarker>
              </DescribeLoadBalancersResult>
              <ResponseMetadata>
                <RequestId>6a6b1e5c-0000-0000-0000-000000000000</RequestId>
              </ResponseMetadata>
            </DescribeLoadBalancersResponse>"#;

        let dispatcher = MockRequestDispatcher::with_status(200)
            .with_body(body)
            .with_request_checker(|request: &SignedRequest| {
                let form = form(request);
                assert!(form.contains("Action=DescribeLoadBalancers"));
                assert!(form.contains("Marker=page-2"));
            });

        let page = provider(dispatcher)
            .page(Some("page-2".into()))
            .await
            .unwrap();

        let names: Vec<_> = page.items.iter().map(|lb| lb.id.name()).collect();

        assert_eq!(names, vec!["edge", "web"]);
        assert_eq!(page.items[0].kind, Some("network".into()));
        assert_eq!(page.next, Some("page-3".into()));
    }

    #[tokio::test]
    async fn modifying_load_balancer_attributes() {
        let body = r#"<ModifyLoadBalancerAttributesResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
              <ModifyLoadBalancerAttributesResult>
              </ModifyLoadBalancerAttributesResult>
              <ResponseMetadata>
                <RequestId>6a6b1e5c-0000-0000-0000-000000000000</RequestId>
              </ResponseMetadata>
            </ModifyLoadBalancerAttributesResponse>"#;

        let dispatcher = MockRequestDispatcher::with_status(200)
            .with_body(body)
            .with_request_checker(|request: &SignedRequest| {
                let form = form(request);
                assert!(form.contains("Action=ModifyLoadBalancerAttributes"));
                assert!(form.contains("LoadBalancerArn="));
                assert!(form.contains("=access_logs.s3.enabled"));
                assert!(form.contains("=access_logs.s3.bucket"));
                assert!(form.contains("=logs-bucket"));
                assert!(form.contains("=access_logs.s3.prefix"));
            });

        let resource = ResourceId::with_handle("edge", "arn:lb/net/edge/1").unwrap();

        provider(dispatcher)
            .enable_logging(&resource, "logs-bucket", "elb/edge")
            .await
            .unwrap();
    }

    #[test]
    fn building_logging_attributes() {
        let attributes = super::logging_attributes("logs-bucket", "elb/my-lb");
        let pairs: Vec<_> = attributes
            .into_iter()
            .map(|attr| (attr.key.unwrap(), attr.value.unwrap()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("access_logs.s3.enabled".to_string(), "true".to_string()),
                ("access_logs.s3.bucket".to_string(), "logs-bucket".to_string()),
                ("access_logs.s3.prefix".to_string(), "elb/my-lb".to_string()),
            ]
        );
    }

    #[test]
    fn describing_load_balancers() {
        let lb = LoadBalancer {
            load_balancer_name: Some("my-lb".into()),
            load_balancer_arn: Some("arn:aws:elasticloadbalancing:lb/net/my-lb/1".into()),
            type_: Some("network".into()),
            ..LoadBalancer::default()
        };

        let descriptor = super::describe(lb).unwrap();

        assert_eq!(descriptor.id.name(), "my-lb");
        assert_eq!(
            descriptor.id.handle(),
            "arn:aws:elasticloadbalancing:lb/net/my-lb/1"
        );
        assert_eq!(descriptor.kind, Some("network".into()));
    }

    #[test]
    fn skipping_load_balancers_without_arn() {
        let lb = LoadBalancer {
            load_balancer_name: Some("my-lb".into()),
            ..LoadBalancer::default()
        };

        assert_eq!(super::describe(lb), None);
    }
}
