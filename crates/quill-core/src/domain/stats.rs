//! Aggregate statistics over a collection of posts.

use super::Post;

/// Sum of like counts across all posts.
pub fn total_likes(posts: &[Post]) -> i64 {
    posts.iter().map(|post| post.likes).sum()
}

/// The post with the highest like count. Ties resolve to the earlier post.
pub fn favorite(posts: &[Post]) -> Option<&Post> {
    posts
        .iter()
        .reduce(|fav, post| if post.likes > fav.likes { post } else { fav })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, likes: i64) -> Post {
        Post::new(
            title.to_string(),
            Some("Edsger W. Dijkstra".to_string()),
            format!("https://example.com/{title}"),
            Some(likes),
            None,
        )
    }

    fn fixture() -> Vec<Post> {
        vec![
            post("go-to-statement-considered-harmful", 5),
            post("canonical-string-reduction", 12),
            post("first-class-citizens", 10),
        ]
    }

    #[test]
    fn total_likes_of_empty_list_is_zero() {
        assert_eq!(total_likes(&[]), 0);
    }

    #[test]
    fn total_likes_of_single_post_equals_its_likes() {
        let posts = vec![post("only", 7)];
        assert_eq!(total_likes(&posts), 7);
    }

    #[test]
    fn total_likes_sums_the_whole_list() {
        assert_eq!(total_likes(&fixture()), 27);
    }

    #[test]
    fn favorite_of_empty_list_is_none() {
        assert!(favorite(&[]).is_none());
    }

    #[test]
    fn favorite_picks_the_most_liked_post() {
        let posts = fixture();
        let fav = favorite(&posts).unwrap();
        assert_eq!(fav.title, "canonical-string-reduction");
        assert_eq!(fav.likes, 12);
    }

    #[test]
    fn favorite_resolves_ties_to_the_earlier_post() {
        let posts = vec![post("a", 4), post("b", 4)];
        assert_eq!(favorite(&posts).unwrap().title, "a");
    }
}
