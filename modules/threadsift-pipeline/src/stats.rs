/// Counters from one pipeline run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub total_input: u32,
    pub normalized: u32,
    pub normalize_failures: u32,
    pub duplicates_skipped: u32,
    pub threads_found: u32,
    pub threaded_posts: u32,
    pub standalone_posts: u32,
    pub posts_scored: u32,
    pub score_fallbacks: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Run Complete ===")?;
        writeln!(f, "Posts in:           {}", self.total_input)?;
        writeln!(f, "Normalized:         {}", self.normalized)?;
        writeln!(f, "Normalize failures: {}", self.normalize_failures)?;
        writeln!(f, "Duplicates skipped: {}", self.duplicates_skipped)?;
        writeln!(f, "Threads found:      {}", self.threads_found)?;
        writeln!(f, "  threaded posts:   {}", self.threaded_posts)?;
        writeln!(f, "  standalone:       {}", self.standalone_posts)?;
        writeln!(f, "Posts scored:       {}", self.posts_scored)?;
        if self.score_fallbacks > 0 {
            writeln!(f, "Score fallbacks:    {}", self.score_fallbacks)?;
        }
        Ok(())
    }
}
