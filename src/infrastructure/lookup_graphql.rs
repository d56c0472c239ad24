use std::collections::HashMap;

use anyhow::anyhow;
use gql_client::Client;
use serde::{Deserialize, Serialize};

use crate::{RepositoryInfo, RepositoryLookup, StdResult};

/// The GraphQL production endpoint for GitHub.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const REPOSITORY_QUERY: &str = r#"
query ($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    nameWithOwner
    description
    stargazerCount
    forkCount
    url
    isArchived
    isFork
    createdAt
    updatedAt
  }
}
"#;

#[derive(Deserialize, Debug)]
struct RepositoryQueryData {
    repository: Option<RepositoryInfo>,
}

/// The variables of the repository query.
#[derive(Debug, Serialize)]
struct RepositoryQueryVariables {
    owner: String,
    name: String,
}

/// Looks up repository metadata through the GitHub GraphQL API.
pub struct GraphQlRepositoryLookup {
    client: Client,
}

impl GraphQlRepositoryLookup {
    /// Creates a new `GraphQlRepositoryLookup` instance authenticated with the
    /// given bearer token.
    pub fn new(endpoint: &str, api_token: &str) -> Self {
        let bearer_token = format!("Bearer {api_token}");
        let mut headers = HashMap::from([("User-Agent", "registry-crawler")]);
        headers.insert("Authorization", &bearer_token);
        let client = Client::new_with_headers(endpoint, headers);

        Self { client }
    }
}

#[async_trait::async_trait]
impl RepositoryLookup for GraphQlRepositoryLookup {
    async fn fetch_repository_info(&self, owner: &str, name: &str) -> StdResult<RepositoryInfo> {
        let variables = RepositoryQueryVariables {
            owner: owner.to_string(),
            name: name.to_string(),
        };
        let fetched_data = self
            .client
            .query_with_vars_unwrap::<RepositoryQueryData, RepositoryQueryVariables>(
                REPOSITORY_QUERY,
                variables,
            )
            .await
            .map_err(|e| anyhow!(e.message().to_string()))?;

        fetched_data
            .repository
            .ok_or_else(|| anyhow!("Repository {owner}/{name} not found"))
    }
}
