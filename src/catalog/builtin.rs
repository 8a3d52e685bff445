//! Built-in tool catalog, one table per category

use crate::domain::{Category, Tool};

const FRONTEND: &[(&str, &str, &str)] = &[
    ("react", "React", "react.dev"),
    ("nextjs", "Next.js", "nextjs.org"),
    ("tanstack", "TanStack Query", "tanstack.com"),
    ("vue", "Vue.js", "vuejs.org"),
    ("angular", "Angular", "angular.io"),
    ("svelte", "Svelte", "svelte.dev"),
    ("remix", "Remix", "remix.run"),
    ("astro", "Astro", "astro.build"),
    ("solid", "SolidJS", "solidjs.com"),
    ("qwik", "Qwik", "qwik.dev"),
    ("sveltekit", "SvelteKit", "kit.svelte.dev"),
    ("nuxt", "Nuxt", "nuxt.com"),
];

const BACKEND: &[(&str, &str, &str)] = &[
    ("nodejs", "Node.js", "nodejs.org"),
    ("express", "Express", "expressjs.com"),
    ("fastify", "Fastify", "fastify.dev"),
    ("nestjs", "NestJS", "nestjs.com"),
    ("python", "Python", "python.org"),
    ("django", "Django", "djangoproject.com"),
    ("flask", "Flask", "flask.palletsprojects.com"),
    ("fastapi", "FastAPI", "fastapi.tiangolo.com"),
    ("go", "Go", "go.dev"),
    ("gin", "Gin", "gin-gonic.com"),
    ("rust", "Rust", "rust-lang.org"),
    ("actix", "Actix", "actix.rs"),
    ("java", "Java", "java.com"),
    ("spring", "Spring Boot", "spring.io"),
    ("php", "PHP", "php.net"),
    ("laravel", "Laravel", "laravel.com"),
    ("ruby", "Ruby", "ruby-lang.org"),
    ("rails", "Ruby on Rails", "rubyonrails.org"),
];

const IDE: &[(&str, &str, &str)] = &[
    ("vscode", "Visual Studio Code", "code.visualstudio.com"),
    ("cursor", "Cursor", "cursor.sh"),
    ("webstorm", "WebStorm", "jetbrains.com/webstorm"),
    ("intellij", "IntelliJ IDEA", "jetbrains.com/idea"),
    ("pycharm", "PyCharm", "jetbrains.com/pycharm"),
    ("sublime", "Sublime Text", "sublimetext.com"),
    ("atom", "Atom", "atom.io"),
    ("vim", "Vim", "vim.org"),
    ("neovim", "Neovim", "neovim.io"),
    ("emacs", "Emacs", "gnu.org/software/emacs"),
    ("xcode", "Xcode", "developer.apple.com/xcode"),
    ("android-studio", "Android Studio", "developer.android.com/studio"),
];

const AI: &[(&str, &str, &str)] = &[
    ("openai", "OpenAI", "openai.com"),
    ("anthropic", "Anthropic", "anthropic.com"),
    ("google-ai", "Google AI", "ai.google.dev"),
    ("huggingface", "Hugging Face", "huggingface.co"),
    ("replicate", "Replicate", "replicate.com"),
    ("langchain", "LangChain", "langchain.com"),
    ("llamaindex", "LlamaIndex", "llamaindex.ai"),
    ("pinecone", "Pinecone", "pinecone.io"),
    ("weaviate", "Weaviate", "weaviate.io"),
    ("cohere", "Cohere", "cohere.com"),
    ("mistral", "Mistral AI", "mistral.ai"),
    ("perplexity", "Perplexity", "perplexity.ai"),
];

const OTHER: &[(&str, &str, &str)] = &[
    ("docker", "Docker", "docker.com"),
    ("kubernetes", "Kubernetes", "kubernetes.io"),
    ("git", "Git", "git-scm.com"),
    ("github", "GitHub", "github.com"),
    ("gitlab", "GitLab", "gitlab.com"),
    ("vercel", "Vercel", "vercel.com"),
    ("netlify", "Netlify", "netlify.com"),
    ("aws", "AWS", "aws.amazon.com"),
    ("gcp", "Google Cloud", "cloud.google.com"),
    ("azure", "Azure", "azure.microsoft.com"),
    ("postgresql", "PostgreSQL", "postgresql.org"),
    ("mongodb", "MongoDB", "mongodb.com"),
    ("redis", "Redis", "redis.io"),
    ("mysql", "MySQL", "mysql.com"),
    ("supabase", "Supabase", "supabase.com"),
    ("firebase", "Firebase", "firebase.google.com"),
];

fn table(category: Category) -> &'static [(&'static str, &'static str, &'static str)] {
    match category {
        Category::Frontend => FRONTEND,
        Category::Backend => BACKEND,
        Category::Ide => IDE,
        Category::Ai => AI,
        Category::Other => OTHER,
    }
}

/// All built-in tools, grouped by category in display order
pub fn builtin_tools() -> Vec<Tool> {
    Category::ALL
        .iter()
        .flat_map(|category| {
            table(*category)
                .iter()
                .map(move |(id, name, url)| Tool::catalog(*id, *name, *url, *category))
        })
        .collect()
}
