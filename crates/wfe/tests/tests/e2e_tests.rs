#[path = "e2e/framework_vs_novel.rs"]
mod framework_vs_novel;

#[path = "e2e/no_shared_context.rs"]
mod no_shared_context;

#[path = "e2e/ambient_tracking_veto.rs"]
mod ambient_tracking_veto;

#[path = "e2e/reconcile_pipeline.rs"]
mod reconcile_pipeline;
