//! Reaction store semantics: like uniqueness, non-idempotent unlike, target
//! validation, comment deletion capability, and cascade behavior.

mod common;

use common::{new_blog, new_event, new_project, MemoryStore};
use community_service::db::ReactionStore;
use community_service::error::AppError;
use community_service::models::{
    ContentKind, ContentRef, ContentStatus, ReactionTarget, Role, TargetKind,
};
use community_service::services::{
    BlogService, EventService, ModerationService, ProjectService, ReactionService, ViewAssembler,
};
use uuid::Uuid;

#[tokio::test]
async fn like_then_unlike_removes_exactly_that_row() {
    let store = MemoryStore::new();
    let author = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);
    let bob = store.seed_user(Role::Member);

    let blog = BlogService::new(store.as_ref())
        .create(&author, new_blog(author.id))
        .await
        .unwrap();
    let target = ReactionTarget::new(TargetKind::Blog, blog.id);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    reactions.like(&alice, target).await.unwrap();
    reactions.like(&bob, target).await.unwrap();

    reactions.unlike(&alice, target).await.unwrap();

    // Bob's like is untouched.
    let remaining = store.likes_for_targets(&[target]).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].author_id, bob.id);
}

#[tokio::test]
async fn double_unlike_fails_with_not_found() {
    let store = MemoryStore::new();
    let author = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let blog = BlogService::new(store.as_ref())
        .create(&author, new_blog(author.id))
        .await
        .unwrap();
    let target = ReactionTarget::new(TargetKind::Blog, blog.id);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    reactions.like(&alice, target).await.unwrap();
    reactions.unlike(&alice, target).await.unwrap();

    let second = reactions.unlike(&alice, target).await;
    assert!(matches!(second, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_like_is_rejected_and_count_stays_one() {
    let store = MemoryStore::new();
    let author = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let project = ProjectService::new(store.as_ref())
        .create(&author, new_project(author.id))
        .await
        .unwrap();
    let target = ReactionTarget::new(TargetKind::Project, project.id);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    reactions.like(&alice, target).await.unwrap();

    let duplicate = reactions.like(&alice, target).await;
    assert!(matches!(duplicate, Err(AppError::Validation(_))));

    assert_eq!(store.likes_for_targets(&[target]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn liking_a_missing_target_fails_with_not_found() {
    let store = MemoryStore::new();
    let alice = store.seed_user(Role::Member);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    for kind in [
        TargetKind::Event,
        TargetKind::Project,
        TargetKind::Blog,
        TargetKind::Comment,
    ] {
        let result = reactions
            .like(&alice, ReactionTarget::new(kind, Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

#[tokio::test]
async fn comments_require_an_existing_target_for_every_kind() {
    let store = MemoryStore::new();
    let alice = store.seed_user(Role::Member);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    for kind in [ContentKind::Event, ContentKind::Project, ContentKind::Blog] {
        let result = reactions
            .comment(
                &alice,
                ContentRef::new(kind, Uuid::new_v4()),
                "hello".to_string(),
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

#[tokio::test]
async fn comment_likes_work_one_level_down() {
    let store = MemoryStore::new();
    let organizer = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let event = EventService::new(store.as_ref())
        .create(&organizer, new_event(organizer.id))
        .await
        .unwrap();

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    let comment = reactions
        .comment(
            &alice,
            ContentRef::new(ContentKind::Event, event.id),
            "Looking forward to it".to_string(),
        )
        .await
        .unwrap();

    let like = reactions
        .like(&alice, ReactionTarget::comment(comment.id))
        .await
        .unwrap();
    assert_eq!(like.target.kind, TargetKind::Comment);
    assert_eq!(like.target.id, comment.id);
}

#[tokio::test]
async fn comment_deletion_allows_author_and_admin_only() {
    let store = MemoryStore::new();
    let organizer = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);
    let stranger = store.seed_user(Role::Member);
    let admin = store.seed_user(Role::Admin);

    let event = EventService::new(store.as_ref())
        .create(&organizer, new_event(organizer.id))
        .await
        .unwrap();

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    let target = ContentRef::new(ContentKind::Event, event.id);

    let first = reactions
        .comment(&alice, target, "first".to_string())
        .await
        .unwrap();
    let second = reactions
        .comment(&alice, target, "second".to_string())
        .await
        .unwrap();

    let forbidden = reactions.delete_comment(&stranger, first.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    reactions.delete_comment(&alice, first.id).await.unwrap();
    reactions.delete_comment(&admin, second.id).await.unwrap();

    assert!(store.fetch_comment(first.id).await.unwrap().is_none());
    assert!(store.fetch_comment(second.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_comment_drops_its_likes() {
    let store = MemoryStore::new();
    let organizer = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let event = EventService::new(store.as_ref())
        .create(&organizer, new_event(organizer.id))
        .await
        .unwrap();

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    let comment = reactions
        .comment(
            &alice,
            ContentRef::new(ContentKind::Event, event.id),
            "soon gone".to_string(),
        )
        .await
        .unwrap();
    let comment_target = ReactionTarget::comment(comment.id);
    reactions.like(&alice, comment_target).await.unwrap();

    reactions.delete_comment(&alice, comment.id).await.unwrap();

    assert!(store
        .likes_for_targets(&[comment_target])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn content_deletion_requires_author_or_admin() {
    let store = MemoryStore::new();
    let author = store.seed_user(Role::Member);
    let stranger = store.seed_user(Role::Member);
    let admin = store.seed_user(Role::Admin);

    let blogs = BlogService::new(store.as_ref());
    let first = blogs.create(&author, new_blog(author.id)).await.unwrap();
    let second = blogs.create(&author, new_blog(author.id)).await.unwrap();

    let forbidden = blogs.delete(&stranger, first.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    blogs.delete(&author, first.id).await.unwrap();
    blogs.delete(&admin, second.id).await.unwrap();
}

/// Once deleted, an approved item disappears from the approved listing.
#[tokio::test]
async fn deleted_content_leaves_the_approved_listing() {
    let store = MemoryStore::new();
    let author = store.seed_user(Role::Member);
    let admin = store.seed_user(Role::Admin);

    let blog = BlogService::new(store.as_ref())
        .create(&author, new_blog(author.id))
        .await
        .unwrap();
    ModerationService::new(store.as_ref(), store.as_ref())
        .review_content(
            &admin,
            ContentRef::new(ContentKind::Blog, blog.id),
            ContentStatus::Approved,
        )
        .await
        .unwrap();

    let assembler = ViewAssembler::new(store.as_ref(), store.as_ref(), store.as_ref());
    assert_eq!(assembler.approved_blogs().await.unwrap().len(), 1);

    BlogService::new(store.as_ref())
        .delete(&author, blog.id)
        .await
        .unwrap();

    assert!(assembler.approved_blogs().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_event_cascades_to_comments_and_likes() {
    let store = MemoryStore::new();
    let organizer = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let event = EventService::new(store.as_ref())
        .create(&organizer, new_event(organizer.id))
        .await
        .unwrap();
    let event_target = ReactionTarget::new(TargetKind::Event, event.id);

    let reactions = ReactionService::new(store.as_ref(), store.as_ref());
    let comment = reactions
        .comment(
            &alice,
            ContentRef::new(ContentKind::Event, event.id),
            "nice".to_string(),
        )
        .await
        .unwrap();
    let comment_target = ReactionTarget::comment(comment.id);

    reactions.like(&alice, event_target).await.unwrap();
    reactions.like(&alice, comment_target).await.unwrap();

    EventService::new(store.as_ref())
        .delete(&organizer, event.id)
        .await
        .unwrap();

    assert!(store.fetch_comment(comment.id).await.unwrap().is_none());
    assert!(store
        .likes_for_targets(&[event_target, comment_target])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn join_and_leave_are_idempotent_set_operations() {
    let store = MemoryStore::new();
    let organizer = store.seed_user(Role::Member);
    let alice = store.seed_user(Role::Member);

    let events = EventService::new(store.as_ref());
    let event = events.create(&organizer, new_event(organizer.id)).await.unwrap();

    events.join(&alice, event.id).await.unwrap();
    events.join(&alice, event.id).await.unwrap();

    use community_service::db::ContentStore;
    assert_eq!(store.participants(event.id).await.unwrap(), vec![alice.id]);

    events.leave(&alice, event.id).await.unwrap();
    assert!(store.participants(event.id).await.unwrap().is_empty());

    let missing = events.join(&alice, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
