use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    entities::slides::{EditSlideEntity, InsertSlideEntity, SLIDES_PATH, SlideEntity},
    repositories::{
        data_access_error::DataAccessResult, realtime_tree::RealtimeTree,
        slides::SlideRepository,
    },
    value_objects::home_content::{AddSlideModel, EditSlideModel},
};
use crate::infra::realtime_db::collection;

pub struct SlideRealtimeDb {
    tree: Arc<dyn RealtimeTree>,
}

impl SlideRealtimeDb {
    pub fn new(tree: Arc<dyn RealtimeTree>) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl SlideRepository for SlideRealtimeDb {
    async fn get_all(&self) -> DataAccessResult<Vec<SlideEntity>> {
        collection::read_all_newest_first(self.tree.as_ref(), SLIDES_PATH).await
    }

    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<SlideEntity>> {
        collection::read_one(self.tree.as_ref(), SLIDES_PATH, id).await
    }

    async fn add(&self, slide: AddSlideModel) -> DataAccessResult<String> {
        let entity = InsertSlideEntity::new(slide, collection::now_millis());
        collection::append(self.tree.as_ref(), SLIDES_PATH, entity).await
    }

    async fn update(&self, id: &str, changes: EditSlideModel) -> DataAccessResult<()> {
        let entity = EditSlideEntity::new(changes, collection::now_millis());
        collection::merge(self.tree.as_ref(), SLIDES_PATH, id, entity).await
    }

    async fn delete(&self, id: &str) -> DataAccessResult<()> {
        collection::remove(self.tree.as_ref(), SLIDES_PATH, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::realtime_tree::MockRealtimeTree;
    use crate::infra::realtime_db::memory::MemoryTree;

    #[tokio::test]
    async fn blank_caption_is_not_written() {
        let mut tree = MockRealtimeTree::new();
        tree.expect_push()
            .withf(|_, payload| payload.get("caption").is_none() && payload["link"] == "/movies")
            .times(1)
            .returning(|_, _| Ok("sl1".to_string()));
        let repo = SlideRealtimeDb::new(Arc::new(tree));

        repo.add(AddSlideModel {
            image_url: "https://cdn.example/hero.jpg".to_string(),
            caption: Some("  ".to_string()),
            link: Some("/movies".to_string()),
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn blank_fields_in_an_edit_are_ignored() {
        let repo = SlideRealtimeDb::new(Arc::new(MemoryTree::new()));
        let id = repo
            .add(AddSlideModel {
                image_url: "https://cdn.example/a.jpg".to_string(),
                caption: Some("Now showing".to_string()),
                link: None,
            })
            .await
            .unwrap();

        repo.update(
            &id,
            EditSlideModel {
                image_url: Some(String::new()),
                caption: Some("Coming soon".to_string()),
                link: None,
            },
        )
        .await
        .unwrap();

        let slide = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(slide.image_url, "https://cdn.example/a.jpg");
        assert_eq!(slide.caption.as_deref(), Some("Coming soon"));
    }
}
