//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use blogfront::net::types::{BlogPost, Category, Comment, User};
use blogfront::state::dashboard::DashboardView;
use blogfront::state::feed::{FeedView, HomeSections};
use blogfront::state::post::PostView;
use blogfront::util::format::{format_date, format_date_time, truncate};

const SUMMARY_CHARS: usize = 120;

pub fn user(user: &User) -> String {
    let mut out = format!("{} (@{}) <{}>", user.display_name(), user.username, user.email);
    if let Some(bio) = user.bio.as_deref().filter(|bio| !bio.is_empty()) {
        let _ = write!(out, "\n{bio}");
    }
    let _ = write!(out, "\nJoined {}", format_date(&user.created_at));
    out
}

/// One-line summary: title, slug, author and date.
pub fn post_line(post: &BlogPost) -> String {
    let draft = if post.is_published { "" } else { " [draft]" };
    format!(
        "{}{draft} ({})\n  by {} in {} on {} | {} likes, {} comments",
        post.title,
        post.slug,
        post.author.display_name(),
        post.category.name,
        format_date(&post.created_at),
        post.likes_count,
        post.comments_count,
    )
}

fn post_block(post: &BlogPost) -> String {
    format!("{}\n  {}", post_line(post), truncate(&post.description, SUMMARY_CHARS))
}

fn post_list(posts: &[BlogPost]) -> String {
    posts.iter().map(post_block).collect::<Vec<_>>().join("\n\n")
}

pub fn feed(feed: &FeedView) -> String {
    let posts = feed.posts.items();
    if posts.is_empty() {
        return "No posts found.".to_owned();
    }
    format!(
        "{}\n\nPage {} of {} ({} posts)",
        post_list(posts),
        feed.page(),
        feed.total_pages,
        feed.total_posts
    )
}

pub fn home(sections: &HomeSections) -> String {
    let mut out = format!("== Featured ==\n{}", post_list(&sections.featured));
    if !sections.recent.is_empty() {
        let _ = write!(out, "\n\n== Recent ==\n{}", post_list(&sections.recent));
    }
    out
}

pub fn post_detail(view: &PostView) -> String {
    let Some(post) = view.post.ready() else {
        return String::new();
    };
    let mut out = format!(
        "{}\nby {} in {} on {}\n{} {} likes\n\n{}",
        post.title,
        post.author.display_name(),
        post.category.name,
        format_date_time(&post.created_at),
        if view.liked { "♥" } else { "♡" },
        view.likes_count,
        post.content.as_deref().unwrap_or(&post.description),
    );
    let _ = write!(out, "\n\nComments ({})\n{}", view.comments.len(), comments(&view.comments));
    out
}

pub fn comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments yet.".to_owned();
    }
    let mut out = String::new();
    for comment in comments {
        comment_tree(&mut out, comment, 0);
    }
    out.trim_end().to_owned()
}

fn comment_tree(out: &mut String, comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(
        out,
        "{indent}#{} {} on {}\n{indent}  {}",
        comment.id,
        comment.user.display_name(),
        format_date_time(&comment.created_at),
        comment.content
    );
    for reply in &comment.replies {
        comment_tree(out, reply, depth + 1);
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let stats = view.stats();
    let header = format!("{} posts, {} likes, {} comments", stats.posts, stats.likes, stats.comments);
    if stats.posts == 0 {
        return format!("{header}\n\nYou have not written any posts yet.");
    }
    format!("{header}\n\n{}", post_list(view.posts.items()))
}

pub fn categories(categories: &[&Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_owned();
    }
    categories
        .iter()
        .map(|category| {
            let mut line = format!("{} ({}) #{}", category.name, category.slug, category.id);
            if !category.description.is_empty() {
                let _ = write!(line, "\n  {}", category.description);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
