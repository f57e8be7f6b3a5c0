//! Recursive dependency tree construction

use crate::error::{AnalyzerError, AnalyzerResult};
use bqva_core::{DependencyTree, NodeId, ObjectRef};
use bqva_sql::extract_references;
use bqva_warehouse::MetadataResolver;
use futures::future::{BoxFuture, FutureExt};

/// Builds the dependency tree of a view.
///
/// Resolution is depth-first: each reference is resolved, attached and fully
/// expanded before the next reference of the same query is looked at. Any
/// failed lookup aborts the whole build.
pub struct TreeBuilder<'a> {
    resolver: &'a dyn MetadataResolver,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self { resolver }
    }

    /// Resolve `root` and everything its query reads, transitively.
    pub async fn build(&self, root: &ObjectRef) -> AnalyzerResult<DependencyTree> {
        log::info!("Analysing view: {}", root);
        let object = self.resolver.resolve(root).await?;
        log::info!("{}: object is of type {}", root, object.kind().label());
        if !object.is_view() {
            return Err(AnalyzerError::InvalidKind {
                object: root.to_string(),
                kind: object.kind().label(),
            });
        }

        let mut tree = DependencyTree::new(object)?;
        let root_id = tree.root();
        self.expand(&mut tree, root_id).await?;
        log::debug!("Dependency tree of {} has {} objects", root, tree.len());
        Ok(tree)
    }

    fn expand<'t>(
        &'t self,
        tree: &'t mut DependencyTree,
        node: NodeId,
    ) -> BoxFuture<'t, AnalyzerResult<()>> {
        async move {
            let object = tree.object(node).clone();
            let Some((query, dialect)) = object.view_definition() else {
                return Ok(());
            };
            let name = object.reference();

            let references = extract_references(query, dialect);
            let count = references.len();
            log::info!("{}: found {} related objects in view query", name, count);

            for (i, reference) in references.iter().enumerate() {
                // Unqualified references live in the project of the view that names them.
                let target = reference.qualify(&name.project)?;
                let child = self.resolver.resolve(&target).await?;
                log::info!("{}: analyzing '{}' ({}/{})", name, target, i + 1, count);
                log::debug!("{}: object is of type {}", target, child.kind().label());

                if tree.has_ancestor(node, child.reference()) {
                    let mut path: Vec<String> = tree
                        .ancestry(node)
                        .into_iter()
                        .map(|id| tree.object(id).reference().to_string())
                        .collect();
                    path.push(child.reference().to_string());
                    return Err(AnalyzerError::CyclicDependency { path });
                }

                let child_id = tree.add_child(node, child)?;
                self.expand(tree, child_id).await?;
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
