//! Text of every file the codemods generate.
//!
//! Fixed files are constants; files assembled from a project's existing
//! configuration are built by the functions below.

/// Tailwind directives for a freshly created `app/globals.css`.
pub const GLOBALS_CSS_BASE: &str = "@tailwind base;
@tailwind components;
@tailwind utilities;
";

/// `app/globals.css` written by the styling fix.
pub const GLOBALS_CSS: &str = "@tailwind base;
@tailwind components;
@tailwind utilities;

/* Additional global styles */
:root {
  --foreground-rgb: 0, 0, 0;
  --background-rgb: 255, 255, 255;
}

@media (prefers-color-scheme: dark) {
  :root {
    --foreground-rgb: 255, 255, 255;
    --background-rgb: 0, 0, 0;
  }
}

body {
  color: rgb(var(--foreground-rgb));
  background: rgb(var(--background-rgb));
}
";

pub const TAILWIND_CONFIG: &str = "/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    './app/**/*.{js,jsx,ts,tsx,md,mdx}',
    './components/**/*.{js,jsx,ts,tsx}',
    './mdx-components.{js,jsx,ts,tsx}'
  ],
  theme: {
    extend: {},
  },
  plugins: [],
}
";

pub const POSTCSS_CONFIG: &str = "module.exports = {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
}
";

/// Root `app/_meta.js` when the site had none.
pub const APP_META: &str = "export default {
  index: {
    title: 'Home'
  },
  '*': {
    theme: {
      breadcrumb: true,
      footer: true,
      sidebar: true,
      toc: true,
      pagination: true
    }
  }
}
";

/// Placeholder page written when `pages/` is removed and no `app/` exists.
pub const CONFLICT_PAGE: &str = "export default function Home() {
  return (
    <div>
      <h1>Welcome</h1>
      <p>This site now uses the App Router.</p>
    </div>
  )
}
";

pub const CONFLICT_LAYOUT: &str = "import './globals.css'

export default function RootLayout({
  children,
}: {
  children: React.ReactNode
}) {
  return (
    <html lang=\"en\">
      <body>{children}</body>
    </html>
  )
}
";

/// Nextra options used when an existing config has none worth keeping.
pub const DEFAULT_NEXTRA_OPTIONS: &str = "{
  defaultShowCopyCode: true
}";

pub const DEFAULT_NEXT_OPTIONS: &str = "{}";

pub const STRICT_NEXT_OPTIONS: &str = "{
  reactStrictMode: true
}";

/// Nextra options for a site rendering code blocks with Code Hike.
pub const CODE_HIKE_NEXTRA_OPTIONS: &str = "{
  defaultShowCopyCode: true,
  mdxOptions: {
    remarkPlugins: [],
    rehypePlugins: []
  }
}";

pub const CODE_HIKE_EXAMPLE_PAGE: &str = "# Code Hike Example

<CH.Code>
```js
function hello() {
  console.log('Hello, world!')
}
```
</CH.Code>

## Code Spotlight

<CH.Spotlight>
```js
function add(a, b) {
  return a + b
}

function subtract(a, b) {
  return a - b
}
```

<CH.Focus lines=\"5-7\" />
`subtract` returns `a` minus `b`.
</CH.Spotlight>
";

pub const PAGEFIND_IGNORE: &str = "# Pagefind search index\n_pagefind/\n";

pub const NPMRC_PRE_POST_SCRIPTS: &str = "enable-pre-post-scripts=true";

pub const MIGRATION_GUIDE_URL: &str =
    "https://github.com/shuding/nextra/blob/main/docs/guide/migration/v3-to-v4.mdx";

/// Which theme package a site is built on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePackage {
    #[default]
    Docs,
    Blog,
}

impl ThemePackage {
    pub fn package(self) -> &'static str {
        match self {
            Self::Docs => "nextra-theme-docs",
            Self::Blog => "nextra-theme-blog",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub locale: String,
    pub name: String,
}

/// Values carried from the old theme configuration into `app/layout.jsx`.
/// Every `Option` that is `None` leaves its prop out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutFields {
    pub theme: ThemePackage,
    /// Import statements the embedded expressions may depend on.
    pub imports: Vec<String>,
    /// Top-level declarations emitted before the navbar.
    pub helpers: Vec<String>,
    /// JSX expression for the navbar logo.
    pub logo: Option<String>,
    pub project_link: Option<String>,
    pub docs_repository_base: Option<String>,
    /// Children of `<Footer>`.
    pub footer: Option<String>,
    pub i18n: Vec<Locale>,
}

pub fn layout(fields: &LayoutFields) -> String {
    let package = fields.theme.package();
    let mut theme_imports = Vec::new();
    if fields.footer.is_some() {
        theme_imports.push("Footer");
    }
    theme_imports.extend(["Layout", "Navbar"]);

    let mut out = String::new();
    out.push_str(&format!(
        "import {{ {} }} from '{}'\n",
        theme_imports.join(", "),
        package
    ));
    out.push_str("import { Head } from 'nextra/components'\n");
    out.push_str("import { getPageMap } from 'nextra/page-map'\n");
    out.push_str(&format!("import '{}/style.css'\n", package));
    out.push_str("import './globals.css'\n");
    for import in &fields.imports {
        out.push_str(import);
        out.push('\n');
    }

    out.push_str(
        "
export const metadata = {
  // Define your metadata here
  // For more information on metadata API, see: https://nextjs.org/docs/app/building-your-application/optimizing/metadata
}
",
    );

    for helper in &fields.helpers {
        out.push('\n');
        out.push_str(helper);
        out.push('\n');
    }

    let mut navbar_props = Vec::new();
    if let Some(logo) = &fields.logo {
        navbar_props.push(format!("logo={{{}}}", logo));
    }
    if let Some(link) = &fields.project_link {
        navbar_props.push(format!("projectLink=\"{}\"", link));
    }
    if navbar_props.is_empty() {
        out.push_str("\nconst navbar = <Navbar />\n");
    } else {
        out.push_str(&format!(
            "\nconst navbar = (\n  <Navbar\n    {}\n  />\n)\n",
            navbar_props.join("\n    ")
        ));
    }

    if let Some(footer) = &fields.footer {
        out.push_str(&format!("\nconst footer = <Footer>{}</Footer>\n", footer));
    }

    let mut layout_props = vec![
        "navbar={navbar}".to_string(),
        "pageMap={await getPageMap()}".to_string(),
    ];
    if let Some(base) = &fields.docs_repository_base {
        layout_props.push(format!("docsRepositoryBase=\"{}\"", base));
    }
    if fields.footer.is_some() {
        layout_props.push("footer={footer}".to_string());
    }
    if !fields.i18n.is_empty() {
        let locales = fields
            .i18n
            .iter()
            .map(|l| {
                format!(
                    "            {{ locale: '{}', name: '{}' }}",
                    escape_single(&l.locale),
                    escape_single(&l.name)
                )
            })
            .collect::<Vec<_>>()
            .join(",\n");
        layout_props.push(format!("i18n={{[\n{}\n          ]}}", locales));
    }

    out.push_str(&format!(
        "
export default async function RootLayout({{ children }}) {{
  return (
    <html lang=\"en\" dir=\"ltr\" suppressHydrationWarning>
      <Head />
      <body>
        <Layout
          {}
        >
          {{children}}
        </Layout>
      </body>
    </html>
  )
}}
",
        layout_props.join("\n          ")
    ));
    out
}

/// `mdx-components.jsx` merging theme defaults, the site's own components
/// and per-call overrides, in that order of precedence (last wins).
pub fn mdx_components(theme: ThemePackage, imports: &[String], custom: &str) -> String {
    let mut out = format!(
        "import {{ useMDXComponents as getThemeComponents }} from '{}'\n",
        theme.package()
    );
    for import in imports {
        out.push_str(import);
        out.push('\n');
    }
    out.push_str(&format!(
        "
const themeComponents = getThemeComponents()

const customComponents = {}

export function useMDXComponents(components) {{
  return {{
    ...themeComponents,
    ...customComponents,
    ...components
  }}
}}
",
        custom
    ));
    out
}

/// Module syntax of a Next.js config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Esm,
    CommonJs,
}

pub fn next_config(kind: ModuleKind, nextra_options: &str, next_options: &str) -> String {
    match kind {
        ModuleKind::Esm => format!(
            "import nextra from 'nextra'

const withNextra = nextra({})

export default withNextra({})
",
            nextra_options, next_options
        ),
        ModuleKind::CommonJs => format!(
            "const nextra = require('nextra')

const withNextra = nextra({})

module.exports = withNextra({})
",
            nextra_options, next_options
        ),
    }
}

/// Default `metadata` export inserted into migrated MDX pages.
pub fn page_metadata(title: &str) -> String {
    format!(
        "export const metadata = {{\n  title: '{}'\n}}\n",
        escape_single(title)
    )
}

pub fn escape_single(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
