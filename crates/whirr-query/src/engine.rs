use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use ipnet::IpNet;
use whirr_schema::SchemaRegistry;
use whirr_store::{RegistryStore, StoredRpslObject};
use whirr_types::{normalize_pk, parse_prefix, ObjectClass, ObjectKey, Source};

use crate::error::{QueryError, QueryResult};
use crate::filter::shape_for_output;
use crate::query::{Query, QueryMode};
use crate::sources::SourceConfig;

/// Recursion bound for set expansion. Cycles are handled by the visited
/// set; this bound catches pathologically deep legitimate nesting.
pub const MAX_EXPANSION_DEPTH: usize = 32;

/// What a query resolves to: objects, or (for set expansion) the
/// de-duplicated member closure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResponse {
    Objects(Vec<StoredRpslObject>),
    Members(Vec<String>),
}

impl QueryResponse {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Objects(objects) => objects.is_empty(),
            Self::Members(members) => members.is_empty(),
        }
    }
}

/// Resolves whois queries against the storage gateway.
///
/// Stateless: each resolve is a pure function of the store contents, so a
/// resolution can be abandoned and restarted freely. The engine applies no
/// authentication; per-source output filtering is data shaping only.
pub struct QueryEngine {
    store: Arc<dyn RegistryStore>,
    schemas: Arc<SchemaRegistry>,
    sources: SourceConfig,
}

impl QueryEngine {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        schemas: Arc<SchemaRegistry>,
        sources: SourceConfig,
    ) -> Self {
        Self {
            store,
            schemas,
            sources,
        }
    }

    pub fn source_config(&self) -> &SourceConfig {
        &self.sources
    }

    /// Resolve one query. An empty result is `Ok`; only genuine failures
    /// (unsearchable attribute, depth bound, bad prefix, storage trouble)
    /// are errors.
    pub fn resolve(&self, query: &Query) -> QueryResult<QueryResponse> {
        let sources = self.sources.selection(query.sources.as_deref())?;
        tracing::debug!(mode = query.mode.name(), key = %query.key, "resolving query");

        let mut objects = match &query.mode {
            QueryMode::Exact => self.resolve_exact(query, &sources)?,
            QueryMode::ReverseAttribute { attribute } => {
                self.resolve_reverse(query, attribute, &sources)?
            }
            QueryMode::SetExpand => {
                let members = self.expand_set(&query.key, &sources)?;
                return Ok(QueryResponse::Members(members.into_iter().collect()));
            }
            QueryMode::LessSpecific | QueryMode::MoreSpecific | QueryMode::ExactPrefix => {
                self.resolve_prefix(query, &sources)?
            }
        };

        for stored in &mut objects {
            if self.sources.is_filtered(&stored.key.source) {
                shape_for_output(&mut stored.object);
            }
        }
        Ok(QueryResponse::Objects(objects))
    }

    /// Recursively expand a set object into its member closure.
    ///
    /// Worklist traversal with an explicit visited set: membership cycles
    /// terminate normally; only nesting deeper than
    /// [`MAX_EXPANSION_DEPTH`] is an error. An unknown root set yields an
    /// empty closure, which is a normal result, not an error.
    pub fn expand_set(&self, name: &str, sources: &[Source]) -> QueryResult<BTreeSet<String>> {
        let mut members = BTreeSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut worklist: Vec<(String, usize)> = vec![(normalize_pk(name), 0)];

        while let Some((set_name, depth)) = worklist.pop() {
            if !visited.insert(set_name.clone()) {
                continue;
            }
            let Some(set_object) = self.lookup_set(&set_name, sources)? else {
                continue;
            };
            if depth >= MAX_EXPANSION_DEPTH {
                return Err(QueryError::DepthExceeded {
                    limit: MAX_EXPANSION_DEPTH,
                });
            }
            for value in set_object.object.values("members") {
                for element in whirr_types::split_list_value(value) {
                    let element = normalize_pk(element);
                    if is_set_name(&element) {
                        worklist.push((element, depth + 1));
                    } else {
                        members.insert(element);
                    }
                }
            }
        }
        Ok(members)
    }

    fn resolve_exact(
        &self,
        query: &Query,
        sources: &[Source],
    ) -> QueryResult<Vec<StoredRpslObject>> {
        let classes = self.requested_classes(query);
        let prefix = parse_prefix(&query.key).ok();
        let pk = normalize_pk(&query.key);
        let mut results = Vec::new();

        for source in sources {
            let mut hits = Vec::new();
            for &class in &classes {
                if class.is_route() {
                    // Route keys are prefix+origin; a bare prefix matches
                    // by exact prefix instead.
                    if let Some(net) = prefix {
                        if class_for_family(&net) == class {
                            hits.extend(self.prefix_matches(
                                source,
                                class,
                                &net,
                                PrefixRelation::Equal,
                            )?);
                        }
                        continue;
                    }
                }
                let key = ObjectKey::new(source.clone(), class, pk.clone());
                if let Some(stored) = self.store.get(&key)? {
                    hits.push(stored);
                }
            }
            let found = !hits.is_empty();
            results.extend(hits);
            if found && !query.all_sources {
                break;
            }
        }
        Ok(results)
    }

    fn resolve_reverse(
        &self,
        query: &Query,
        attribute: &str,
        sources: &[Source],
    ) -> QueryResult<Vec<StoredRpslObject>> {
        let attribute = attribute.to_ascii_lowercase();
        let classes = self.requested_classes(query);
        let searchable = classes
            .iter()
            .any(|&class| self.schemas.schema_for(class).is_lookup_key(&attribute));
        if !searchable {
            return Err(QueryError::UnsearchableAttribute(attribute));
        }

        let mut results = Vec::new();
        for source in sources {
            let hits = self
                .store
                .get_by_attribute(source, None, &attribute, &query.key)?;
            results.extend(
                hits.into_iter()
                    .filter(|stored| classes.contains(&stored.key.class)),
            );
        }
        Ok(results)
    }

    fn resolve_prefix(
        &self,
        query: &Query,
        sources: &[Source],
    ) -> QueryResult<Vec<StoredRpslObject>> {
        let net =
            parse_prefix(&query.key).map_err(|_| QueryError::InvalidPrefix(query.key.clone()))?;
        let classes = self.requested_classes(query);
        if !classes.iter().any(|c| c.is_route()) {
            return Err(QueryError::UnsupportedMode {
                mode: query.mode.name(),
            });
        }
        let class = class_for_family(&net);
        if !classes.contains(&class) {
            return Ok(Vec::new());
        }
        let relation = match query.mode {
            QueryMode::LessSpecific => PrefixRelation::Covering,
            QueryMode::MoreSpecific => PrefixRelation::Inside,
            _ => PrefixRelation::Equal,
        };

        let mut results = Vec::new();
        for source in sources {
            results.extend(self.prefix_matches(source, class, &net, relation)?);
        }
        Ok(results)
    }

    /// Route objects in one source whose prefix stands in `relation` to
    /// `net`, in insertion order. Prefix comparison is address-aware,
    /// never textual.
    fn prefix_matches(
        &self,
        source: &Source,
        class: ObjectClass,
        net: &IpNet,
        relation: PrefixRelation,
    ) -> QueryResult<Vec<StoredRpslObject>> {
        let mut hits = Vec::new();
        for stored in self.store.list_class(source, class)? {
            let Some(value) = stored.object.first_value(class.as_str()) else {
                continue;
            };
            let Ok(stored_net) = parse_prefix(value) else {
                continue;
            };
            let matched = match relation {
                PrefixRelation::Equal => stored_net == *net,
                // Less-specific: the stored prefix covers the query,
                // including the exact match.
                PrefixRelation::Covering => stored_net.contains(net),
                // More-specific: strictly inside the query prefix.
                PrefixRelation::Inside => net.contains(&stored_net) && stored_net != *net,
            };
            if matched {
                hits.push(stored);
            }
        }
        Ok(hits)
    }

    fn lookup_set(
        &self,
        pk: &str,
        sources: &[Source],
    ) -> QueryResult<Option<StoredRpslObject>> {
        for source in sources {
            for class in [ObjectClass::AsSet, ObjectClass::RouteSet] {
                let key = ObjectKey::new(source.clone(), class, pk.to_string());
                if let Some(stored) = self.store.get(&key)? {
                    return Ok(Some(stored));
                }
            }
        }
        Ok(None)
    }

    fn requested_classes(&self, query: &Query) -> Vec<ObjectClass> {
        query
            .class_filter
            .clone()
            .unwrap_or_else(|| ObjectClass::ALL.to_vec())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PrefixRelation {
    Equal,
    Covering,
    Inside,
}

/// The route class holding prefixes of this address family.
fn class_for_family(net: &IpNet) -> ObjectClass {
    match net {
        IpNet::V4(_) => ObjectClass::Route,
        IpNet::V6(_) => ObjectClass::Route6,
    }
}

/// Set names are distinguished from leaf members by their shape: any
/// hierarchy component starting with `AS-` or `RS-`.
fn is_set_name(name: &str) -> bool {
    name.split(':')
        .any(|part| part.starts_with("AS-") || part.starts_with("RS-"))
}
