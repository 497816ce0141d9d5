//! Drives an [`Interaction`] against a [`Backend`].
//!
//! Every mutation is followed by a full refetch of the project snapshot, and
//! the tree index is rebuilt from scratch. Effects on selection and edit
//! focus are applied only after both calls succeed.

use crate::backend::Backend;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::input::InputEvent;
use crate::machine::{Intent, Interaction};
use fnt_core::{NodeId, ProjectId, Relation, TreeIndex, UpdateNodeRequest};

pub struct Controller<B: Backend> {
    backend: B,
    project_id: ProjectId,
    interaction: Interaction,
    loaded: bool,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, project_id: ProjectId, config: EditorConfig) -> Self {
        Self {
            backend,
            project_id,
            interaction: Interaction::new(config),
            loaded: false,
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Fetch the snapshot and rebuild the tree.
    pub async fn load(&mut self) -> Result<(), EditorError> {
        self.refresh().await?;
        self.loaded = true;
        Ok(())
    }

    /// Feed one input event through the state machine and carry out what it
    /// asks for.
    pub async fn dispatch(&mut self, event: InputEvent) -> Result<(), EditorError> {
        if !self.loaded {
            return Err(EditorError::NotLoaded);
        }
        let intents = self.interaction.handle(event);
        self.execute(intents).await
    }

    /// Change the relation on the edge above `node_id`.
    pub async fn update_relation(
        &mut self,
        node_id: NodeId,
        relation: Relation,
        label: Option<String>,
    ) -> Result<(), EditorError> {
        if !self.loaded {
            return Err(EditorError::NotLoaded);
        }
        match self.interaction.relate(node_id, relation, label)? {
            Some(intent) => self.execute(vec![intent]).await,
            None => Ok(()),
        }
    }

    /// Run `intents` in order, stopping at the first failure. Intents after
    /// a failed one are dropped.
    pub async fn execute(&mut self, intents: Vec<Intent>) -> Result<(), EditorError> {
        for intent in intents {
            log::debug!("execute {intent:?}");
            if let Err(err) = self.run(intent).await {
                log::warn!("backend call failed, stopping batch: {err}");
                return Err(err);
            }
        }
        Ok(())
    }

    async fn run(&mut self, intent: Intent) -> Result<(), EditorError> {
        let project = self.project_id;
        match intent {
            Intent::UpdateContent {
                node_id,
                content,
                keep_open,
            } => {
                let request = UpdateNodeRequest {
                    content: content.clone(),
                };
                self.backend.update_node(project, node_id, request).await?;
                self.refresh().await?;
                self.interaction.on_committed(node_id, &content, keep_open);
            }
            Intent::Create(request) => {
                let created = self.backend.create_node(project, request).await?;
                self.refresh().await?;
                self.interaction.on_created(created.node.id);
            }
            Intent::UpdateEdge { edge_id, request } => {
                self.backend.update_edge(project, edge_id, request).await?;
                self.refresh().await?;
            }
            Intent::Delete { node_id, subtree } => {
                self.backend.delete_node(project, node_id).await?;
                self.refresh().await?;
                self.interaction.on_deleted(node_id, &subtree);
            }
            Intent::Reorder(request) => {
                self.backend.reorder(project, request).await?;
                self.refresh().await?;
            }
            Intent::Focus { node_id, edit } => {
                self.interaction.on_focus(node_id, edit);
            }
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), EditorError> {
        let snapshot = self.backend.fetch_tree(self.project_id).await?;
        log::debug!(
            "refreshed {}: {} nodes, {} edges",
            self.project_id,
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        self.interaction.replace_tree(TreeIndex::from_snapshot(&snapshot));
        Ok(())
    }
}
