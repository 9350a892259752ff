// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Kind-typed listing with at-most-one options discipline.

use crate::infrastructure::constants::{DEFAULT_OBJECT_NAME, MULTIPLE_LIST_OPTIONS};
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::{from_dynamic, ApiClient};
use crate::infrastructure::kubernetes::scheme::Scheme;
use crate::shared::error::{KubeError, Result};
use futures::future::try_join_all;
use tracing::{debug, info};

/// Options bag accepted by every list call.
pub type ListOptions = kube::api::ListParams;

/// Zero or one options bag; more than one is rejected rather than merged.
pub fn single_list_options(options: &[ListOptions]) -> Result<ListOptions> {
    match options {
        [] => Ok(ListOptions::default()),
        [only] => Ok(only.clone()),
        _ => Err(KubeError::InvalidArgument(MULTIPLE_LIST_OPTIONS.to_string())),
    }
}

/// Lists objects of kind `K` and wraps each in its own builder.
///
/// `namespace == None` lists across all namespaces; an explicitly empty
/// namespace is rejected for namespaced kinds.
pub async fn list_builders<K: Kind>(
    client: &ApiClient,
    namespace: Option<&str>,
    options: &[ListOptions],
) -> Result<Vec<Builder<K>>> {
    if K::NAMESPACED && namespace == Some("") {
        return Err(KubeError::InvalidArgument(format!(
            "failed to list {}s, 'namespace' parameter is empty",
            K::KIND_NAME
        )));
    }

    let options = single_list_options(options)?;

    debug!(
        kind = K::KIND_NAME,
        namespace = namespace.unwrap_or("all"),
        label_selector = options.label_selector.as_deref().unwrap_or_default(),
        "Listing objects"
    );

    client.attach_scheme(&Scheme::of::<K>())?;

    let resource = Builder::<K>::api_resource();
    let items = client
        .list(&resource, namespace.filter(|_| K::NAMESPACED), &options)
        .await?;

    items
        .into_iter()
        .map(|item| from_dynamic::<K>(item, &resource).map(|object| Builder::from_object(client, object)))
        .collect()
}

/// Deletes every listed object except the `default` fixture.
pub async fn clean_all<K: Kind>(
    client: &ApiClient,
    namespace: Option<&str>,
    options: &[ListOptions],
) -> Result<()> {
    let mut builders = list_builders::<K>(client, namespace, options).await?;

    try_join_all(
        builders
            .iter_mut()
            .filter(|builder| builder.name() != DEFAULT_OBJECT_NAME)
            .map(|builder| builder.delete()),
    )
    .await?;

    info!(
        kind = K::KIND_NAME,
        namespace = namespace.unwrap_or("all"),
        "Removed all non-default objects"
    );

    Ok(())
}
